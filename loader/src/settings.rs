//! Loader settings file.
//!
//! Controls which sources an aggregation pass reads. Every field is optional.
//!
//! # Example YAML
//!
//! ```yaml
//! app_name: k9s
//! include_extra_sources: true
//! overrides:
//!   - /home/me/.config/k9s/clusters/prod/leaders.yaml
//! extra_dirs:
//!   - /opt/team-shortcuts
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paths::{DEFAULT_APP_NAME, PathCatalog};

/// Errors reading or writing a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Source selection for an aggregation pass.
///
/// # Examples
///
/// ```
/// use leaderkit_loader::LoaderSettings;
///
/// let settings: LoaderSettings = serde_yaml::from_str("app_name: k9s\n").unwrap();
/// assert_eq!(settings.app_name, "k9s");
/// assert!(settings.include_extra_sources);
/// assert!(settings.overrides.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderSettings {
    /// Application name used for directory lookups.
    pub app_name: String,
    /// Scan the fragment directories after the global file.
    pub include_extra_sources: bool,
    /// Optional files loaded right after the global file, in order.
    pub overrides: Vec<PathBuf>,
    /// Extra roots appended after the discovered ones (highest precedence).
    pub extra_dirs: Vec<PathBuf>,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            include_extra_sources: true,
            overrides: Vec::new(),
            extra_dirs: Vec::new(),
        }
    }
}

impl LoaderSettings {
    /// Loads settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the file cannot be read, or
    /// [`SettingsError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let settings = serde_yaml::from_reader(reader)?;
        Ok(settings)
    }

    /// Saves the settings as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the file cannot be written, or
    /// [`SettingsError::Yaml`] if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Discovers a catalog for `app_name` and appends `extra_dirs`.
    pub fn catalog(&self) -> PathCatalog {
        let mut catalog = PathCatalog::discover(&self.app_name);
        for dir in &self.extra_dirs {
            catalog.push_root(dir.clone());
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
app_name: k9s
include_extra_sources: false
overrides:
  - /cfg/prod/leaders.yaml
extra_dirs:
  - /opt/shortcuts
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let settings: LoaderSettings = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(settings.app_name, "k9s");
        assert!(!settings.include_extra_sources);
        assert_eq!(settings.overrides, vec![PathBuf::from("/cfg/prod/leaders.yaml")]);
        assert_eq!(settings.extra_dirs, vec![PathBuf::from("/opt/shortcuts")]);
    }

    #[test]
    fn test_deserialize_empty_mapping_uses_defaults() {
        let settings: LoaderSettings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings, LoaderSettings::default());
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(serde_yaml::from_str::<LoaderSettings>("colour: red\n").is_err());
    }

    #[test]
    fn test_extra_dirs_take_highest_precedence() {
        let settings: LoaderSettings = serde_yaml::from_str(sample_yaml()).unwrap();
        let catalog = settings.catalog();
        assert_eq!(catalog.app_name(), "k9s");
        assert_eq!(
            catalog.roots().last(),
            Some(&PathBuf::from("/opt/shortcuts"))
        );
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.yaml");

        let original: LoaderSettings = serde_yaml::from_str(sample_yaml()).unwrap();
        original.save(&path).unwrap();
        let loaded = LoaderSettings::load(&path).unwrap();
        assert_eq!(loaded, original);
    }
}
