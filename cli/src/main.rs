use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use leaderkit_core::{BuiltinValidator, SchemaKind, SchemaValidator};
use leaderkit_loader::{
    FragmentKind, LayeredLoader, LeaderKind, LoaderSettings, PathCatalog, PluginKind,
    walk_fragments,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Output format for merged collections.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "leaderkit")]
#[command(about = "Inspect layered leader and plugin shortcut configuration")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Loader settings file (YAML).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load and print the merged leaders.
    Leaders(LoadArgs),
    /// Load and print the merged plugins.
    Plugins(LoadArgs),
    /// Classify and strictly decode fragment files or directories.
    Validate(ValidateArgs),
    /// Print the files and directories an aggregation pass reads.
    Paths(SourceArgs),
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Application name used for directory lookups.
    #[arg(long)]
    app: Option<String>,
    /// Directory holding the global fragment files.
    #[arg(long)]
    config_dir: Option<PathBuf>,
    /// Root probed at <root>/<app>/<kind>; repeatable, replaces discovered roots.
    #[arg(long = "root")]
    roots: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct LoadArgs {
    #[command(flatten)]
    sources: SourceArgs,
    /// Optional fragment loaded right after the global file; repeatable.
    #[arg(long = "override")]
    overrides: Vec<PathBuf>,
    /// Read only the global file and overrides, skipping fragment dirs.
    #[arg(long)]
    no_extra: bool,
    /// Output format.
    #[arg(long, default_value = "yaml")]
    format: CliOutputFormat,
    /// Exit with an error if any fragment failed to load.
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Fragment files and/or directories containing fragments.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_settings(cli.settings.as_deref()).and_then(|settings| match cli.command {
        Command::Leaders(args) => run_load(LeaderKind, &settings, args),
        Command::Plugins(args) => run_load(PluginKind, &settings, args),
        Command::Validate(args) => run_validate(args),
        Command::Paths(args) => run_paths(&settings, args),
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_settings(path: Option<&Path>) -> Result<LoaderSettings, String> {
    match path {
        Some(path) => LoaderSettings::load(path)
            .map_err(|err| format!("Failed to load settings '{}': {err}", path.display())),
        None => Ok(LoaderSettings::default()),
    }
}

fn resolve_catalog(settings: &LoaderSettings, args: &SourceArgs) -> PathCatalog {
    let mut catalog = match &args.app {
        Some(app) => LoaderSettings {
            app_name: app.clone(),
            ..settings.clone()
        }
        .catalog(),
        None => settings.catalog(),
    };
    if !args.roots.is_empty() {
        catalog.set_roots(args.roots.clone());
    }
    match &args.config_dir {
        Some(dir) => PathCatalog::new(catalog.app_name(), dir.clone(), catalog.roots().to_vec()),
        None => catalog,
    }
}

fn run_load<K>(kind: K, settings: &LoaderSettings, args: LoadArgs) -> Result<(), String>
where
    K: FragmentKind,
    K::Entry: Serialize,
{
    let catalog = resolve_catalog(settings, &args.sources);
    let overrides: Vec<PathBuf> = settings
        .overrides
        .iter()
        .chain(&args.overrides)
        .cloned()
        .collect();
    let include_extra = settings.include_extra_sources && !args.no_extra;

    let loaded = LayeredLoader::from_catalog(kind, &catalog).load_all(&overrides, include_extra);

    if let Some(errors) = loaded.error() {
        eprintln!("{} fragment(s) failed to load:", errors.len());
        for err in errors {
            eprintln!("  {err}");
        }
    }

    let sorted = loaded.collection.sorted();
    let rendered = match args.format {
        CliOutputFormat::Json => serde_json::to_string_pretty(&sorted)
            .map_err(|err| format!("Failed to serialize output: {err}"))?,
        CliOutputFormat::Yaml => serde_yaml::to_string(&sorted)
            .map_err(|err| format!("Failed to serialize output: {err}"))?,
    };
    println!("{}", rendered.trim_end());

    match loaded.error() {
        Some(errors) if args.strict => Err(format!(
            "{} fragment(s) failed to load (--strict)",
            errors.len()
        )),
        _ => Ok(()),
    }
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut checked = 0usize;
    let mut failures = 0usize;

    for input in &args.inputs {
        if !input.exists() {
            return Err(format!("Input '{}' does not exist", input.display()));
        }
        for item in walk_fragments(input) {
            checked += 1;
            let outcome = item
                .map_err(|err| err.to_string())
                .and_then(|path| check_fragment(&path).map(|schema| (path, schema)));
            match outcome {
                Ok((path, schema)) => println!("ok     {} ({schema})", path.display()),
                Err(err) => {
                    failures += 1;
                    println!("error  {err}");
                }
            }
        }
    }

    println!("Checked {checked} fragment(s), {failures} failed.");
    if failures > 0 {
        return Err(format!("{failures} fragment(s) failed validation"));
    }
    Ok(())
}

fn check_fragment(path: &Path) -> Result<SchemaKind, String> {
    let bytes =
        fs::read(path).map_err(|err| format!("{}: failed to read: {err}", path.display()))?;
    let schema = BuiltinValidator
        .validate(&bytes)
        .map_err(|err| format!("{}: {err}", path.display()))?;

    let decoded = if LeaderKind.accepts(schema) {
        LeaderKind.decode(schema, path, &bytes).map(|_| ())
    } else {
        PluginKind.decode(schema, path, &bytes).map(|_| ())
    };
    decoded.map_err(|err| format!("{}: {err}", path.display()))?;

    Ok(schema)
}

fn run_paths(settings: &LoaderSettings, args: SourceArgs) -> Result<(), String> {
    let catalog = resolve_catalog(settings, &args);

    println!("app:        {}", catalog.app_name());
    println!("config dir: {}", catalog.config_dir().display());
    print_kind_paths(&catalog, &LeaderKind);
    print_kind_paths(&catalog, &PluginKind);
    for path in &settings.overrides {
        println!("override:   {}", present(path));
    }
    Ok(())
}

fn print_kind_paths<K: FragmentKind>(catalog: &PathCatalog, kind: &K) {
    println!("{}:", kind.name());
    println!("  global  {}", present(&catalog.global_file(kind)));
    for dir in catalog.fragment_dirs(kind) {
        println!("  dir     {}", present(&dir));
    }
}

fn present(path: &Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (missing)", path.display())
    }
}
