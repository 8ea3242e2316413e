//! Controls Configuration Module
//!
//! Resolver defaults and log settings loaded from a TOML file.
//!
//! ## Loading Order
//!
//! 1. `WELL_CONTROLS_CONFIG` environment variable (path to TOML file)
//! 2. `well_controls.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! The resolvers never read the global config. Binaries initialize it once
//! and derive `ResolverSettings` from it:
//!
//! ```ignore
//! config::init(ControlsConfig::load());
//! let resolver = ControlResolver::new((&config::get().resolver).into());
//! ```

mod controls_config;
pub mod defaults;
pub mod validation;

pub use controls_config::*;

use std::sync::OnceLock;

/// Global configuration, initialized once at startup.
static CONTROLS_CONFIG: OnceLock<ControlsConfig> = OnceLock::new();

/// Initialize the global configuration.
///
/// Later calls are ignored with a warning.
pub fn init(config: ControlsConfig) {
    if CONTROLS_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Get the global configuration.
///
/// Calling this before `init()` locks in the built-in defaults.
pub fn get() -> &'static ControlsConfig {
    CONTROLS_CONFIG.get_or_init(ControlsConfig::default)
}

/// Check whether the config has been initialized.
pub fn is_initialized() -> bool {
    CONTROLS_CONFIG.get().is_some()
}
