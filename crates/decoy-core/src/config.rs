//! Runtime configuration.
//!
//! Configuration is validated at load time. [`RuntimeConfig::apply`] installs
//! the capture mode and the default verification mode process-wide; call it
//! before constructing any sink or double.

use std::path::Path;
use std::sync::RwLock;

use decoy_capture::{Mode, set_mode};
use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, Result};
use crate::recorder::VerificationMode;

/// Environment variable overriding the configured mode.
pub const MODE_ENV: &str = "DECOY_MODE";

static DEFAULT_VERIFICATION: RwLock<VerificationMode> = RwLock::new(VerificationMode::Exactly(1));

/// Default verification mode picked up by new doubles.
#[must_use]
pub fn default_verification() -> VerificationMode {
    *DEFAULT_VERIFICATION
        .read()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Replaces the default verification mode; returns the previous one.
pub fn set_default_verification(mode: VerificationMode) -> VerificationMode {
    let mut guard = DEFAULT_VERIFICATION
        .write()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    std::mem::replace(&mut *guard, mode)
}

/// Process-wide runtime settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Storage strategy for sinks, ledgers and stub tables.
    #[serde(default)]
    pub mode: Mode,

    /// Mode used by `verify` when none is given.
    #[serde(default)]
    pub default_verification: VerificationMode,
}

impl RuntimeConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns an error for modes that can never be satisfied meaningfully.
    pub fn validate(&self) -> Result<()> {
        match self.default_verification {
            VerificationMode::Exactly(0) => Err(DispatchError::config(
                "default_verification exactly 0 is ambiguous, use never",
            )),
            VerificationMode::AtMost(0) => Err(DispatchError::config(
                "default_verification at_most 0 is ambiguous, use never",
            )),
            _ => Ok(()),
        }
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| DispatchError::config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DispatchError::config(format!("failed to read config: {e}")))?;
        Self::from_toml_str(&content)
    }

    /// Overlays `DECOY_MODE` from the environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_mode_override(std::env::var(MODE_ENV).ok().as_deref())
    }

    fn with_mode_override(mut self, value: Option<&str>) -> Result<Self> {
        if let Some(raw) = value {
            self.mode = Mode::parse(raw).ok_or_else(|| {
                DispatchError::config(format!("invalid {MODE_ENV} value: {raw}"))
            })?;
        }
        Ok(self)
    }

    /// Installs the configuration process-wide.
    pub fn apply(&self) {
        set_mode(self.mode);
        set_default_verification(self.default_verification);
        tracing::info!(
            mode = %self.mode,
            default_verification = %self.default_verification,
            "applied runtime config"
        );
    }
}
