use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Runs the binary with a sandboxed environment so host config is never read.
fn leaderkit(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_leaderkit"))
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("XDG_DATA_HOME", home.join(".local/share"))
        .env("XDG_DATA_DIRS", home.join("share"))
        .env_remove("LEADERKIT_CONFIG_DIR")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run leaderkit")
}

fn write(root: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

fn leader_yaml(keyspace: &str, command: &str) -> String {
    format!(
        "leaders:\n  l:\n    keyspace: {keyspace}\n    shortcuts:\n      - shortCut: x\n        command: {command}\n"
    )
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ---------------------------------------------------------------------------
// leaders
// ---------------------------------------------------------------------------

#[test]
fn leaders_merges_config_and_roots_in_order() {
    let tmp = TempDir::new().unwrap();
    let cfg = tmp.path().join("cfg");
    write(&cfg, "leaders.yaml", &leader_yaml("pods", "global"));
    write(tmp.path(), "a/k9s/leaders/pods.yaml", &leader_yaml("pods", "a"));
    write(tmp.path(), "b/k9s/leaders/pods.yaml", &leader_yaml("pods", "b"));
    write(tmp.path(), "a/k9s/leaders/svc.yaml", &leader_yaml("svc", "a"));

    let output = leaderkit(
        tmp.path(),
        &[
            "leaders",
            "--app",
            "k9s",
            "--config-dir",
            cfg.to_str().unwrap(),
            "--root",
            tmp.path().join("a").to_str().unwrap(),
            "--root",
            tmp.path().join("b").to_str().unwrap(),
            "--format",
            "json",
        ],
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json = stdout_json(&output);
    assert_eq!(json["pods"]["shortcuts"][0]["command"], "b");
    assert_eq!(json["svc"]["keyspace"], "svc");
}

#[test]
fn leaders_no_extra_reads_only_global_file() {
    let tmp = TempDir::new().unwrap();
    let cfg = tmp.path().join("cfg");
    write(&cfg, "leaders.yaml", &leader_yaml("pods", "global"));
    write(tmp.path(), "a/k9s/leaders/svc.yaml", &leader_yaml("svc", "a"));

    let output = leaderkit(
        tmp.path(),
        &[
            "leaders",
            "--app",
            "k9s",
            "--config-dir",
            cfg.to_str().unwrap(),
            "--root",
            tmp.path().join("a").to_str().unwrap(),
            "--no-extra",
            "--format",
            "json",
        ],
    );

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert!(json.get("pods").is_some());
    assert!(json.get("svc").is_none());
}

#[test]
fn leaders_reports_bad_fragment_but_still_prints() {
    let tmp = TempDir::new().unwrap();
    let cfg = tmp.path().join("cfg");
    write(&cfg, "leaders.yaml", "leaders: nope\n");
    write(tmp.path(), "a/k9s/leaders/svc.yaml", &leader_yaml("svc", "a"));

    let root = tmp.path().join("a");
    let owned: Vec<String> = [
        "leaders",
        "--app",
        "k9s",
        "--config-dir",
        cfg.to_str().unwrap(),
        "--root",
        root.to_str().unwrap(),
        "--format",
        "json",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    let args: Vec<&str> = owned.iter().map(String::as_str).collect();

    let output = leaderkit(tmp.path(), &args);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("1 fragment(s) failed to load"), "{stderr}");
    assert!(stdout_json(&output).get("svc").is_some());

    let mut strict = args.clone();
    strict.push("--strict");
    let output = leaderkit(tmp.path(), &strict);
    assert!(!output.status.success());
}

#[test]
fn leaders_respects_settings_file() {
    let tmp = TempDir::new().unwrap();
    let cfg = tmp.path().join("cfg");
    write(&cfg, "leaders.yaml", &leader_yaml("pods", "global"));
    let ctx = write(tmp.path(), "ctx/leaders.yaml", &leader_yaml("pods", "ctx"));
    let settings = write(
        tmp.path(),
        "settings.yaml",
        &format!(
            "app_name: k9s\ninclude_extra_sources: false\noverrides:\n  - {}\n",
            ctx.display()
        ),
    );

    let output = leaderkit(
        tmp.path(),
        &[
            "--settings",
            settings.to_str().unwrap(),
            "leaders",
            "--config-dir",
            cfg.to_str().unwrap(),
            "--format",
            "json",
        ],
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        stdout_json(&output)["pods"]["shortcuts"][0]["command"],
        "ctx"
    );
}

#[test]
fn missing_settings_file_fails() {
    let tmp = TempDir::new().unwrap();
    let output = leaderkit(
        tmp.path(),
        &[
            "--settings",
            tmp.path().join("nope.yaml").to_str().unwrap(),
            "paths",
        ],
    );
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// plugins
// ---------------------------------------------------------------------------

#[test]
fn plugins_prints_yaml_by_default() {
    let tmp = TempDir::new().unwrap();
    let cfg = tmp.path().join("cfg");
    write(
        &cfg,
        "plugins.yaml",
        "plugins:\n  dive:\n    shortCut: d\n    command: dive\n",
    );

    let output = leaderkit(
        tmp.path(),
        &["plugins", "--config-dir", cfg.to_str().unwrap(), "--no-extra"],
    );

    assert!(output.status.success());
    let parsed: serde_yaml::Value = serde_yaml::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["dive"]["command"], serde_yaml::Value::from("dive"));
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn validate_accepts_good_fragments() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "frags/leaders.yaml", &leader_yaml("pods", "x"));
    write(tmp.path(), "frags/dive.yml", "shortCut: d\ncommand: dive\n");

    let output = leaderkit(
        tmp.path(),
        &["validate", tmp.path().join("frags").to_str().unwrap()],
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{stdout}");
    assert!(stdout.contains("(leaders)"));
    assert!(stdout.contains("(plugin)"));
    assert!(stdout.contains("Checked 2 fragment(s), 0 failed."));
}

#[test]
fn validate_rejects_unknown_fields() {
    let tmp = TempDir::new().unwrap();
    let path = write(
        tmp.path(),
        "bad.yaml",
        "leaders:\n  l:\n    keyspace: pods\n    colour: red\n",
    );

    let output = leaderkit(tmp.path(), &["validate", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("error"));
}

// ---------------------------------------------------------------------------
// paths
// ---------------------------------------------------------------------------

#[test]
fn paths_lists_kind_dirs_under_each_root() {
    let tmp = TempDir::new().unwrap();
    let output = leaderkit(
        tmp.path(),
        &[
            "paths",
            "--app",
            "k9s",
            "--root",
            tmp.path().join("r").to_str().unwrap(),
        ],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let leaders_dir = tmp.path().join("r/k9s/leaders");
    let plugins_dir = tmp.path().join("r/k9s/plugins");
    assert!(stdout.contains(&leaders_dir.display().to_string()));
    assert!(stdout.contains(&plugins_dir.display().to_string()));
    assert!(stdout.contains("(missing)"));
}

#[test]
fn paths_keeps_settings_extra_dirs_when_app_is_overridden() {
    let tmp = TempDir::new().unwrap();
    let team = tmp.path().join("team");
    let settings = write(
        tmp.path(),
        "settings.yaml",
        &format!("app_name: other\nextra_dirs:\n  - {}\n", team.display()),
    );

    let output = leaderkit(
        tmp.path(),
        &["--settings", settings.to_str().unwrap(), "paths", "--app", "k9s"],
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("app:        k9s"));
    assert!(stdout.contains(&team.join("k9s/leaders").display().to_string()));
    assert!(!stdout.contains("/other/"));
}
