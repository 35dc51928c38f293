//! Application context for CLI command execution.
//!
//! [`App`] finds and loads the configuration, then loads the person store
//! the commands work against.
//!
//! # Example
//!
//! ```no_run
//! use stemma::app::{App, Sources};
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::load(Path::new("."), &Sources::default()).await?;
//!     println!("{} people", app.store().len());
//!     Ok(())
//! }
//! ```

use crate::config::{find_config, StemmaConfig};
use crate::error::{ConfigError, Result};
use crate::store::{load_from_jsonl, LoadWarning, PersonStore};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Explicit overrides for where config and data come from.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    /// Config file; must exist when given
    pub config: Option<PathBuf>,
    /// Data file; replaces the config's `data-file`
    pub data: Option<PathBuf>,
}

/// Application context for CLI operations.
#[derive(Debug)]
pub struct App {
    config: StemmaConfig,
    config_path: Option<PathBuf>,
    data_path: PathBuf,
    store: PersonStore,
    warnings: Vec<LoadWarning>,
}

impl App {
    /// Create an App from the given working directory.
    ///
    /// Uses `sources.config` when given, otherwise the nearest `stemma.yaml`
    /// at or above `working_dir`, otherwise defaults. A relative data path
    /// from the config is resolved against the config's directory; one from
    /// `sources.data` against `working_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An explicit config file does not exist
    /// - The configuration cannot be parsed or is invalid
    /// - The data file cannot be read
    pub async fn load(working_dir: &Path, sources: &Sources) -> Result<Self> {
        let config_path = match &sources.config {
            Some(path) => {
                let path = working_dir.join(path);
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => find_config(working_dir),
        };

        let (config, base_dir) = match &config_path {
            Some(path) => {
                debug!(path = %path.display(), "Loading configuration");
                let base = path.parent().unwrap_or(working_dir).to_path_buf();
                (StemmaConfig::load(path).await?, base)
            }
            None => {
                debug!("No configuration file found, using defaults");
                (StemmaConfig::default(), working_dir.to_path_buf())
            }
        };

        let data_path = match &sources.data {
            Some(path) => working_dir.join(path),
            None => config.data_path(&base_dir),
        };
        let (store, warnings) = load_from_jsonl(&data_path).await?;

        Ok(Self {
            config,
            config_path,
            data_path,
            store,
            warnings,
        })
    }

    /// The loaded person store.
    pub fn store(&self) -> &PersonStore {
        &self.store
    }

    /// Warnings produced while loading.
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    /// Effective configuration.
    pub fn config(&self) -> &StemmaConfig {
        &self.config
    }

    /// Config file in use, if any.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Data file the store was read from.
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_FILE_NAME;
    use crate::error::Error;
    use tempfile::TempDir;

    const ROWS: &str = r#"{"id": "1", "name": "Ada", "spouse_id": "2"}
{"id": "2", "name": "Bo", "spouse_id": "1"}
{"id": "3", "name": "Cy", "father_id": "1", "mother_id": "2"}
"#;

    #[tokio::test]
    async fn loads_defaults_without_config() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("family.jsonl"), ROWS).unwrap();

        let app = App::load(temp_dir.path(), &Sources::default()).await.unwrap();

        assert_eq!(app.store().len(), 3);
        assert!(app.warnings().is_empty());
        assert!(app.config_path().is_none());
        assert_eq!(app.config(), &StemmaConfig::default());
    }

    #[tokio::test]
    async fn data_file_resolves_against_config_directory() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "data-file: data/people.jsonl\n",
        )
        .unwrap();
        std::fs::create_dir(temp_dir.path().join("data")).unwrap();
        std::fs::write(temp_dir.path().join("data/people.jsonl"), ROWS).unwrap();
        let nested = temp_dir.path().join("notes");
        std::fs::create_dir(&nested).unwrap();

        let app = App::load(&nested, &Sources::default()).await.unwrap();

        assert_eq!(app.store().len(), 3);
        assert_eq!(app.data_path(), temp_dir.path().join("data/people.jsonl"));
    }

    #[tokio::test]
    async fn data_override_wins() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("other.jsonl"), "{\"id\": \"9\"}\n").unwrap();
        let sources = Sources {
            config: None,
            data: Some(PathBuf::from("other.jsonl")),
        };

        let app = App::load(temp_dir.path(), &sources).await.unwrap();
        assert_eq!(app.store().len(), 1);
    }

    #[tokio::test]
    async fn missing_explicit_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let sources = Sources {
            config: Some(PathBuf::from("nope.yaml")),
            data: None,
        };

        let err = App::load(temp_dir.path(), &sources).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NotFound(_))));
    }

    #[tokio::test]
    async fn missing_data_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = App::load(temp_dir.path(), &Sources::default()).await.unwrap_err();
        assert!(matches!(err, Error::Rows(_)));
    }
}
