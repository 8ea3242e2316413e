//! Well Controls: production control resolution for reservoir simulation schedules
//!
//! Resolves, for one well at one report step, which control mode governs the
//! well, which limits apply and which alternative controls remain available.
//!
//! ## Architecture
//!
//! - **Types**: control modes, control sets and the resolved `ProductionControls`
//! - **Record**: read-only access to parsed, unit-converted keyword records
//! - **Resolver**: WCONHIST (historical) and WCONPROD (predictive) resolution
//! - **Sequence**: threads one well's states through its report steps in order
//! - **Config**: TOML configuration for resolver defaults and logging

pub mod config;
pub mod record;
pub mod resolver;
pub mod sequence;
pub mod types;

// Re-export configuration
pub use config::ControlsConfig;

// Re-export commonly used types
pub use record::{DeckRecord, KeywordRecord};
pub use resolver::{ControlError, ControlResolver, ResolverSettings};
pub use sequence::{ControlSchedule, ControlSequence, ControlStep};
pub use types::{
    ControlMode, ControlSet, InvalidControlState, ParseControlModeError, ProductionControls,
    DEFAULT_BHP_LIMIT,
};
