//! Controls Configuration - resolver defaults and logging as TOML values
//!
//! Each struct implements `Default` with the values the resolvers use when no
//! config file is present, so an absent file changes nothing.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "WELL_CONTROLS_CONFIG";

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "well_controls.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration.
///
/// Load with `ControlsConfig::load()` which searches:
/// 1. `$WELL_CONTROLS_CONFIG` env var
/// 2. `./well_controls.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlsConfig {
    /// Resolver defaults
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ControlsConfig {
    /// Load configuration using the standard search order.
    ///
    /// A file that fails to load is logged and skipped, never fatal.
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded controls config from {CONFIG_ENV_VAR}");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {CONFIG_ENV_VAR}, falling back");
                    }
                }
            } else {
                warn!(path = %path, "{CONFIG_ENV_VAR} points to non-existent file, falling back");
            }
        }

        // 2. Check ./well_controls.toml
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded controls config from ./{LOCAL_CONFIG_FILE}");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{LOCAL_CONFIG_FILE}, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No {LOCAL_CONFIG_FILE} found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate TOML text. Unknown keys are logged as warnings.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!(key = w.key(), "{w}");
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate values for internal consistency.
    ///
    /// Rules:
    /// - The default BHP limit must be finite and positive
    /// - The log level must be one `tracing` understands
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let bhp = self.resolver.default_bhp_limit_pa;
        if !bhp.is_finite() || bhp <= 0.0 {
            errors.push(format!(
                "resolver.default_bhp_limit_pa must be finite and > 0 (got {bhp})"
            ));
        }

        if !defaults::LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            errors.push(format!(
                "logging.level '{}' is not one of {:?}",
                self.logging.level,
                defaults::LOG_LEVELS
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Resolver
// ============================================================================

/// Defaults applied by the control resolvers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// BHP limit (Pa) used when a limit is reset or not stated. One atmosphere.
    #[serde(default = "default_bhp_limit_pa")]
    pub default_bhp_limit_pa: f64,
}

fn default_bhp_limit_pa() -> f64 {
    crate::types::DEFAULT_BHP_LIMIT
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_bhp_limit_pa: default_bhp_limit_pa(),
        }
    }
}

// ============================================================================
// Logging
// ============================================================================

/// Log filter and format used when `RUST_LOG` is not set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter level: trace, debug, info, warn or error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    defaults::DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = ControlsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.resolver.default_bhp_limit_pa, 101_325.0);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ControlsConfig::from_toml_str(
            r#"
[logging]
json = true
"#,
        )
        .unwrap();
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.resolver, ResolverConfig::default());
    }

    #[test]
    fn test_non_positive_bhp_limit_rejected() {
        let err = ControlsConfig::from_toml_str(
            r#"
[resolver]
default_bhp_limit_pa = 0.0
"#,
        )
        .unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("default_bhp_limit_pa"));
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let mut config = ControlsConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        config.logging.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_to_toml_parses_back() {
        let mut config = ControlsConfig::default();
        config.resolver.default_bhp_limit_pa = 2.5e5;
        let text = config.to_toml().unwrap();
        assert_eq!(ControlsConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = ControlsConfig::from_toml_str("[resolver\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(..)));
    }
}
