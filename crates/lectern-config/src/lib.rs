//! # lectern-config
//!
//! Layered configuration loading for Lectern using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`LECTERN_*` prefix, `__` as separator)
//! 2. Project-level `.lectern/config.toml`
//! 3. User-level `~/.config/lectern/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `LECTERN_API__BASE_URL` -> `api.base_url`,
//! `LECTERN_PRESENCE__DEMO_MODE` -> `presence.demo_mode`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use lectern_config::LecternConfig;
//!
//! let config = LecternConfig::load_with_dotenv().expect("config");
//! let api = config.require_api().expect("api configured");
//! println!("backend: {}", api.normalized_base_url());
//! ```

mod api;
mod error;
mod general;
mod presence;

pub use api::ApiConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use presence::PresenceConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LecternConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub presence: PresenceConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl LecternConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source cannot be parsed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".lectern/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("LECTERN_").split("__"))
    }

    /// Reject values that would make the client misbehave at runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero poll interval or timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.presence.interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "presence.interval_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// The API section, or [`ConfigError::NotConfigured`] if no base URL is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when `api.base_url` is empty.
    pub fn require_api(&self) -> Result<&ApiConfig, ConfigError> {
        if self.api.is_configured() {
            Ok(&self.api)
        } else {
            Err(ConfigError::NotConfigured {
                section: "api".into(),
            })
        }
    }

    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.presence.interval_ms)
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lectern").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = LecternConfig::default();
        assert!(!config.api.is_configured());
        assert!(!config.presence.demo_mode);
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
    }

    #[test]
    fn require_api_reports_missing_section() {
        let config = LecternConfig::default();
        let err = config.require_api().unwrap_err();
        assert!(matches!(err, ConfigError::NotConfigured { section } if section == "api"));
    }

    #[test]
    fn zero_interval_is_invalid() {
        let mut config = LecternConfig::default();
        config.presence.interval_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("presence.interval_ms"));
    }
}
