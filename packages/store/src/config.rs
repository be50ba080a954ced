//! Data directory configuration.
//!
//! Settings come from an optional TOML file:
//!
//! ```toml
//! data_dir = "/var/lib/hotline"
//! incidents_file = "incident_report.jsonl"
//! accounts_file = "user_database.jsonl"
//! ```
//!
//! Every key is optional. The data directory can also be overridden with
//! the `HOTLINE_DATA_DIR` environment variable.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming the TOML config file.
pub const CONFIG_ENV: &str = "HOTLINE_CONFIG";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "HOTLINE_DATA_DIR";

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default incident store file name.
pub const DEFAULT_INCIDENTS_FILE: &str = "incident_report.jsonl";

/// Default account store file name.
pub const DEFAULT_ACCOUNTS_FILE: &str = "user_database.jsonl";

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has wrongly typed keys.
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Where the store files live.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding both store files.
    pub data_dir: PathBuf,
    /// Incident store file name, relative to `data_dir`.
    pub incidents_file: String,
    /// Account store file name, relative to `data_dir`.
    pub accounts_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            incidents_file: DEFAULT_INCIDENTS_FILE.to_string(),
            accounts_file: DEFAULT_ACCOUNTS_FILE.to_string(),
        }
    }
}

impl StoreConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not a valid config.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Resolves the effective config from explicit arguments and the
    /// process environment.
    ///
    /// The config file is `config_path`, else `$HOTLINE_CONFIG`, else none
    /// (defaults). The data directory is `data_dir`, else
    /// `$HOTLINE_DATA_DIR`, else whatever the file (or default) says.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a named config file cannot be loaded.
    pub fn resolve(config_path: Option<&Path>, data_dir: Option<&Path>) -> Result<Self, ConfigError> {
        Self::resolve_with(config_path, data_dir, |key| std::env::var(key).ok())
    }

    /// [`Self::resolve`] with an injectable environment lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a named config file cannot be loaded.
    pub fn resolve_with(
        config_path: Option<&Path>,
        data_dir: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let config_path = config_path
            .map(Path::to_path_buf)
            .or_else(|| env(CONFIG_ENV).map(PathBuf::from));

        let mut config = match config_path {
            Some(path) => {
                log::debug!("Loading config from {}", path.display());
                Self::load(&path)?
            }
            None => Self::default(),
        };

        if let Some(dir) = data_dir
            .map(Path::to_path_buf)
            .or_else(|| env(DATA_DIR_ENV).map(PathBuf::from))
        {
            config.data_dir = dir;
        }

        Ok(config)
    }

    /// Full path of the incident store file.
    #[must_use]
    pub fn incidents_path(&self) -> PathBuf {
        self.data_dir.join(&self.incidents_file)
    }

    /// Full path of the account store file.
    #[must_use]
    pub fn accounts_path(&self) -> PathBuf {
        self.data_dir.join(&self.accounts_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_point_into_data_dir() {
        let config = StoreConfig::default();
        assert_eq!(
            config.incidents_path(),
            Path::new("data").join("incident_report.jsonl")
        );
        assert_eq!(
            config.accounts_path(),
            Path::new("data").join("user_database.jsonl")
        );
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = StoreConfig::from_toml_str("data_dir = \"/srv/hotline\"").unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/hotline"));
        assert_eq!(config.incidents_file, DEFAULT_INCIDENTS_FILE);
    }

    #[test]
    fn rejects_wrongly_typed_keys() {
        assert!(matches!(
            StoreConfig::from_toml_str("incidents_file = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn explicit_data_dir_beats_env_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("hotline.toml");
        std::fs::write(&file, "data_dir = \"from-file\"\naccounts_file = \"a.jsonl\"").unwrap();

        let env = |key: &str| (key == DATA_DIR_ENV).then(|| "from-env".to_string());

        let from_env = StoreConfig::resolve_with(Some(&file), None, env).unwrap();
        assert_eq!(from_env.data_dir, PathBuf::from("from-env"));
        assert_eq!(from_env.accounts_file, "a.jsonl");

        let explicit =
            StoreConfig::resolve_with(Some(&file), Some(Path::new("from-flag")), env).unwrap();
        assert_eq!(explicit.data_dir, PathBuf::from("from-flag"));
    }

    #[test]
    fn config_path_from_env() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("hotline.toml");
        std::fs::write(&file, "incidents_file = \"reports.jsonl\"").unwrap();
        let file_str = file.display().to_string();

        let env = move |key: &str| (key == CONFIG_ENV).then(|| file_str.clone());
        let config = StoreConfig::resolve_with(None, None, env).unwrap();
        assert_eq!(config.incidents_file, "reports.jsonl");
    }

    #[test]
    fn missing_config_file_is_a_read_error() {
        let result =
            StoreConfig::resolve_with(Some(Path::new("/nonexistent/hotline.toml")), None, no_env);
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
