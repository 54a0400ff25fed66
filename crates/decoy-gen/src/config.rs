//! Generator configuration (`decoy-gen.toml`).
//!
//! Relative paths are resolved against the directory holding the config file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};

/// Default config file name looked up by the binary.
pub const DEFAULT_CONFIG: &str = "decoy-gen.toml";

fn default_runtime_path() -> String {
    "::decoy::runtime".to_string()
}

/// What to generate and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenConfig {
    /// JSON descriptor file written by the front-end.
    pub descriptors: PathBuf,

    /// Output directory; deleted and recreated on every run.
    pub output_dir: PathBuf,

    /// Qualified names of types to mock.
    #[serde(default)]
    pub mocks: Vec<String>,

    /// Qualified names of types to spy on.
    #[serde(default)]
    pub spies: Vec<String>,

    /// Path generated code uses to reach `decoy-core`.
    #[serde(default = "default_runtime_path")]
    pub runtime_path: String,
}

impl GenConfig {
    /// Creates a config with no requested doubles.
    #[must_use]
    pub fn new(descriptors: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            descriptors: descriptors.into(),
            output_dir: output_dir.into(),
            mocks: Vec::new(),
            spies: Vec::new(),
            runtime_path: default_runtime_path(),
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.descriptors.as_os_str().is_empty() {
            return Err(GenError::config("descriptors cannot be empty"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(GenError::config("output_dir cannot be empty"));
        }
        if self.output_dir.parent().is_none() {
            return Err(GenError::config("output_dir cannot be a filesystem root"));
        }
        if let Some(name) = self.mocks.iter().chain(&self.spies).find(|n| n.trim().is_empty()) {
            return Err(GenError::config(format!("invalid type name: {name:?}")));
        }
        if self.runtime_path.trim().is_empty() {
            return Err(GenError::config("runtime_path cannot be empty"));
        }
        Ok(())
    }

    /// Parses and validates TOML text. Paths are kept as written.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| GenError::config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| GenError::config(format!("failed to read config: {e}")))?;
        let mut config = Self::from_toml_str(&content)?;
        if let Some(base) = path.parent() {
            config.descriptors = base.join(&config.descriptors);
            config.output_dir = base.join(&config.output_dir);
        }
        Ok(config)
    }
}
