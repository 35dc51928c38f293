//! Implementation of the `init` command.
//!
//! Writes a default `stemma.yaml` and, when missing, an empty data file so
//! that the other commands work straight away.

use crate::config::{StemmaConfig, CONFIG_FILE_NAME};
use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Result of the init command
#[derive(Debug)]
pub struct InitResult {
    /// Path to the created config file
    pub config_file: PathBuf,
    /// Resolved path of the data file
    pub data_file: PathBuf,
    /// Whether an empty data file was created
    pub created_data_file: bool,
}

/// Initialize stemma in the given directory.
///
/// # Arguments
///
/// * `base_dir` - Directory where `stemma.yaml` will be created
/// * `data_file` - Optional data file path recorded in the config
///
/// # Errors
///
/// Returns an error if:
/// - `stemma.yaml` already exists
/// - The data file path is empty
/// - File system operations fail
pub async fn init(base_dir: &Path, data_file: Option<&Path>) -> Result<InitResult> {
    let config_file = base_dir.join(CONFIG_FILE_NAME);
    if fs::try_exists(&config_file).await? {
        return Err(ConfigError::AlreadyExists(config_file).into());
    }

    let mut config = StemmaConfig::default();
    if let Some(path) = data_file {
        config.data_file = path.to_path_buf();
    }
    config.validate()?;
    config.save(&config_file).await?;

    let data_file = config.data_path(base_dir);
    let created_data_file = !fs::try_exists(&data_file).await?;
    if created_data_file {
        if let Some(parent) = data_file.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&data_file, "").await?;
    }

    info!(config = %config_file.display(), "Initialized stemma");
    Ok(InitResult {
        config_file,
        data_file,
        created_data_file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    #[tokio::test]
    async fn init_writes_default_config_and_empty_data_file() {
        let temp_dir = TempDir::new().unwrap();

        let result = init(temp_dir.path(), None).await.unwrap();

        assert!(result.created_data_file);
        assert_eq!(result.data_file, temp_dir.path().join("family.jsonl"));
        let config = StemmaConfig::load(&result.config_file).await.unwrap();
        assert_eq!(config, StemmaConfig::default());
        let content = tokio::fs::read_to_string(&result.data_file).await.unwrap();
        assert!(content.is_empty());
    }

    #[tokio::test]
    async fn init_records_custom_data_file_and_keeps_existing_data() {
        let temp_dir = TempDir::new().unwrap();
        let rows = "{\"id\": \"1\"}\n";
        std::fs::create_dir(temp_dir.path().join("data")).unwrap();
        std::fs::write(temp_dir.path().join("data/tree.jsonl"), rows).unwrap();

        let result = init(temp_dir.path(), Some(Path::new("data/tree.jsonl")))
            .await
            .unwrap();

        assert!(!result.created_data_file);
        let content = tokio::fs::read_to_string(&result.data_file).await.unwrap();
        assert_eq!(content, rows);
        let config = StemmaConfig::load(&result.config_file).await.unwrap();
        assert_eq!(config.data_file, PathBuf::from("data/tree.jsonl"));
    }

    #[tokio::test]
    async fn init_refuses_to_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        init(temp_dir.path(), None).await.unwrap();

        let err = init(temp_dir.path(), None).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::AlreadyExists(_))));
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn init_rejects_empty_data_file() {
        let temp_dir = TempDir::new().unwrap();

        let err = init(temp_dir.path(), Some(Path::new(""))).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Invalid(_))));
        assert!(!temp_dir.path().join(CONFIG_FILE_NAME).exists());
    }
}
