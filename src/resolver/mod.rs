//! Production Control Resolution
//!
//! Turns one production keyword record into the [`ProductionControls`] that
//! govern a well for the current report step.
//!
//! ## Entry points
//!
//! - **History** (`WCONHIST`): observed rates. The stated control mode is
//!   mandatory, may be overridden by a WHISTCL directive, and the BHP limit,
//!   VFP table and lift quantity may be inherited from the previous step.
//! - **Prediction** (`WCONPROD`): target limits. Every explicitly stated limit
//!   becomes an available control; the previous step is not consulted.
//!
//! Both paths always make BHP available and return either a complete state or
//! a [`ControlError`].
//!
//! ## Usage
//!
//! ```ignore
//! let resolver = ControlResolver::new(ResolverSettings::default());
//! let step1 = resolver.history(None, &record, None, false)?;
//! let step2 = resolver.history(Some(&step1), &next_record, Some(ControlMode::Resv), false)?;
//! ```

mod error;
mod history;
mod prediction;

pub use error::ControlError;

use serde::{Deserialize, Serialize};

use crate::record::DeckRecord;
use crate::types::{ControlMode, ProductionControls, DEFAULT_BHP_LIMIT};

pub(crate) const WCONHIST: &str = "WCONHIST";
pub(crate) const WCONPROD: &str = "WCONPROD";

/// Tunables for the resolvers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// BHP limit (Pa) used whenever a limit cannot be inherited or is not stated
    pub default_bhp_limit: f64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            default_bhp_limit: DEFAULT_BHP_LIMIT,
        }
    }
}

impl From<&crate::config::ResolverConfig> for ResolverSettings {
    fn from(cfg: &crate::config::ResolverConfig) -> Self {
        Self {
            default_bhp_limit: cfg.default_bhp_limit_pa,
        }
    }
}

/// Stateless resolver; holds only its settings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlResolver {
    settings: ResolverSettings,
}

impl ControlResolver {
    pub fn new(settings: ResolverSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }
}

impl ProductionControls {
    /// Resolve a WCONHIST record with default settings.
    pub fn history(
        previous: Option<&ProductionControls>,
        record: &impl DeckRecord,
        override_mode: Option<ControlMode>,
        switching_from_injector: bool,
    ) -> Result<Self, ControlError> {
        ControlResolver::default().history(previous, record, override_mode, switching_from_injector)
    }

    /// Resolve a WCONPROD record with default settings, keeping BHP as the
    /// current control when the record has no CMODE.
    pub fn prediction(
        record: &impl DeckRecord,
        add_group_control: bool,
    ) -> Result<Self, ControlError> {
        ControlResolver::default().prediction(record, add_group_control, ControlMode::Bhp)
    }
}

/// Numeric item value, zero when the record carries nothing for it
fn value_or_zero(record: &impl DeckRecord, item: &str) -> f64 {
    record.value(item).unwrap_or(0.0)
}

/// VFP table number; only the deck sentinel 0 means "unset".
///
/// Anything else that is not a whole positive table number fails the record
/// instead of silently falling back to the inherited table.
fn vfp_table(
    record: &impl DeckRecord,
    item: &str,
    keyword: &'static str,
) -> Result<Option<u32>, ControlError> {
    match record.value(item) {
        None => Ok(None),
        Some(v) if v == 0.0 => Ok(None),
        Some(v) => record
            .int_value(item)
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| ControlError::InvalidVfpTable {
                value: v.to_string(),
                keyword,
            }),
    }
}

/// Lift quantity; exactly 0.0 is the deck's "unset" sentinel.
///
/// A genuinely zero lift quantity is indistinguishable from "unset" here and
/// is inherited like any other unset value.
fn lift_quantity(record: &impl DeckRecord, item: &str) -> Option<f64> {
    record.value(item).filter(|v| *v != 0.0)
}
