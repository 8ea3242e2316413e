//! System-wide default constants.

// ============================================================================
// Logging
// ============================================================================

/// Filter level used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Levels accepted for `logging.level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

// ============================================================================
// Config Validation
// ============================================================================

/// Largest edit distance for which an unknown key gets a "did you mean" hint.
pub const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Default BHP limits above this (Pa) are accepted but reported as suspicious.
///
/// 1 000 bar is far beyond any producer's bottom hole pressure floor.
pub const SUSPICIOUS_BHP_LIMIT_PA: f64 = 1.0e8;
