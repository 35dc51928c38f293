//! `stemma.yaml` loading, discovery and validation.

use crate::error::{ConfigError, Result};
use crate::generation::{GenerationOptions, ParentScope, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "stemma.yaml";

/// Data file used when the config does not name one
pub const DEFAULT_DATA_FILE: &str = "family.jsonl";

/// Upper bound for `generations.max-depth`
pub const MAX_DEPTH_LIMIT: u32 = 10_000;

/// Maximum directory depth to traverse when searching for a config file
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct StemmaConfig {
    /// Person rows, JSON Lines
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Generation assignment tuning
    #[serde(default)]
    pub generations: GenerationSection,

    /// Default view limits
    #[serde(default)]
    pub view: ViewSection,
}

/// The `generations` section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct GenerationSection {
    /// Recursion depth guard
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Where parents are looked up
    #[serde(default)]
    pub parent_scope: ParentScope,
}

/// The `view` section.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct ViewSection {
    /// Ancestor levels shown when the CLI gets none
    #[serde(default)]
    pub generations_back: u32,

    /// Descendant levels shown when the CLI gets none
    #[serde(default)]
    pub generations_forward: u32,
}

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

impl Default for GenerationSection {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            parent_scope: ParentScope::default(),
        }
    }
}

impl Default for StemmaConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            generations: GenerationSection::default(),
            view: ViewSection::default(),
        }
    }
}

impl StemmaConfig {
    /// Load and validate configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML, or
    /// holds out-of-range values. An empty file yields the defaults.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending key.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.data_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data-file must not be empty".to_string()));
        }
        let depth = self.generations.max_depth;
        if !(1..=MAX_DEPTH_LIMIT).contains(&depth) {
            return Err(ConfigError::Invalid(format!(
                "generations.max-depth must be between 1 and {MAX_DEPTH_LIMIT}, got {depth}"
            )));
        }
        Ok(())
    }

    /// Options for the generation assigner.
    #[must_use]
    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            max_depth: self.generations.max_depth,
            parent_scope: self.generations.parent_scope,
        }
    }

    /// The data file path, resolved against `base_dir` when relative.
    #[must_use]
    pub fn data_path(&self, base_dir: &Path) -> PathBuf {
        if self.data_file.is_absolute() {
            self.data_file.clone()
        } else {
            base_dir.join(&self.data_file)
        }
    }
}

/// Find `stemma.yaml` in `start_dir` or one of its ancestors.
///
/// Gives up at the filesystem root or after [`MAX_TRAVERSAL_DEPTH`] levels.
#[must_use]
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}
