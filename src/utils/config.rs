use crate::state::CheckpointPolicy;
use crate::utils::errors::{ChunkTailError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub checkpoint: CheckpointConfig,
    pub analyze: AnalyzeConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    /// Source records consumed between two flushes (or snapshot swaps).
    pub interval: usize,
    /// Also fsync file data at every checkpoint.
    pub sync: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeConfig {
    pub sample_rows: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub default_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            interval: 1000,
            sync: false,
        }
    }
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self { sample_rows: 35 }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_path: PathBuf::from("result.txt"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ChunkTailError::ConfigError(format!("{}: {}", path, e)))?;
        let config: Self =
            toml::from_str(&content).map_err(|e| ChunkTailError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when the file is missing or
    /// invalid. The second value is the load error for an invalid file, so
    /// the caller can report it once logging is up.
    pub fn load_or_default(path: &str) -> (Self, Option<ChunkTailError>) {
        if !std::path::Path::new(path).exists() {
            return (Self::default(), None);
        }
        match Self::load_from_file(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.checkpoint.interval == 0 {
            return Err(ChunkTailError::ConfigError(
                "checkpoint.interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn checkpoint_policy(&self) -> Result<CheckpointPolicy> {
        CheckpointPolicy::new(self.checkpoint.interval)
            .map(|policy| policy.with_sync(self.checkpoint.sync))
    }
}
