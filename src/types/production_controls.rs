//! Resolved production control state for one well at one report step

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ControlMode, ControlSet};

/// Default bottom hole pressure limit: one standard atmosphere (Pa).
pub const DEFAULT_BHP_LIMIT: f64 = 101_325.0;

/// Authoritative control state of a producer.
///
/// Produced once per (well, report step) by [`crate::resolver::ControlResolver`]
/// and never mutated afterwards; the next step only reads it as the previous
/// state. Rates and pressures are SI.
///
/// Invariants:
/// - `active_controls` always contains BHP
/// - `current_control` is a member of `active_controls`
/// - a historical state never has THP, CRAT or GRUP as current control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredControls")]
pub struct ProductionControls {
    pub(crate) oil_rate: f64,
    pub(crate) water_rate: f64,
    pub(crate) gas_rate: f64,
    pub(crate) liquid_rate: f64,
    pub(crate) resv_rate: f64,

    pub(crate) bhp_limit: f64,
    pub(crate) thp_limit: f64,

    /// Measured BHP, historical records only
    pub(crate) bhp_history: Option<f64>,
    /// Measured THP, historical records only
    pub(crate) thp_history: Option<f64>,

    /// `None` means no table was ever given (deck value 0)
    pub(crate) vfp_table: Option<u32>,
    /// `None` means no lift quantity was ever given (deck value 0.0)
    pub(crate) alq: Option<f64>,

    pub(crate) active_controls: ControlSet,
    pub(crate) current_control: ControlMode,
    pub(crate) prediction_mode: bool,
}

/// Stored state that breaks one of the [`ProductionControls`] invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidControlState {
    #[error("active controls {active} do not include BHP")]
    MissingBhp { active: String },

    #[error("current control {current} is not among the active controls {active}")]
    CurrentNotActive { current: ControlMode, active: String },

    #[error("historical state can not be under {current} control")]
    IneffectiveHistoryControl { current: ControlMode },
}

/// Field-for-field shape of a serialized [`ProductionControls`], checked
/// before it becomes one.
#[derive(Deserialize)]
struct StoredControls {
    oil_rate: f64,
    water_rate: f64,
    gas_rate: f64,
    liquid_rate: f64,
    resv_rate: f64,
    bhp_limit: f64,
    thp_limit: f64,
    bhp_history: Option<f64>,
    thp_history: Option<f64>,
    vfp_table: Option<u32>,
    alq: Option<f64>,
    active_controls: ControlSet,
    current_control: ControlMode,
    prediction_mode: bool,
}

impl TryFrom<StoredControls> for ProductionControls {
    type Error = InvalidControlState;

    fn try_from(stored: StoredControls) -> Result<Self, Self::Error> {
        let active = stored.active_controls;
        let current = stored.current_control;

        if !active.contains(ControlMode::Bhp) {
            return Err(InvalidControlState::MissingBhp {
                active: active.to_string(),
            });
        }
        if !active.contains(current) {
            return Err(InvalidControlState::CurrentNotActive {
                current,
                active: active.to_string(),
            });
        }
        if !stored.prediction_mode && !current.is_effective_history_control() {
            return Err(InvalidControlState::IneffectiveHistoryControl { current });
        }

        Ok(Self {
            oil_rate: stored.oil_rate,
            water_rate: stored.water_rate,
            gas_rate: stored.gas_rate,
            liquid_rate: stored.liquid_rate,
            resv_rate: stored.resv_rate,
            bhp_limit: stored.bhp_limit,
            thp_limit: stored.thp_limit,
            bhp_history: stored.bhp_history,
            thp_history: stored.thp_history,
            vfp_table: stored.vfp_table,
            alq: stored.alq,
            active_controls: active,
            current_control: current,
            prediction_mode: stored.prediction_mode,
        })
    }
}

impl Default for ProductionControls {
    /// State of a producer before any production keyword was applied.
    ///
    /// Counts as prediction mode, so a first WCONHIST record starts from the
    /// default BHP limit.
    fn default() -> Self {
        Self {
            oil_rate: 0.0,
            water_rate: 0.0,
            gas_rate: 0.0,
            liquid_rate: 0.0,
            resv_rate: 0.0,
            bhp_limit: 0.0,
            thp_limit: 0.0,
            bhp_history: None,
            thp_history: None,
            vfp_table: None,
            alq: None,
            active_controls: [ControlMode::Bhp].into_iter().collect(),
            current_control: ControlMode::Bhp,
            prediction_mode: true,
        }
    }
}

impl ProductionControls {
    pub fn oil_rate(&self) -> f64 {
        self.oil_rate
    }

    pub fn water_rate(&self) -> f64 {
        self.water_rate
    }

    pub fn gas_rate(&self) -> f64 {
        self.gas_rate
    }

    pub fn liquid_rate(&self) -> f64 {
        self.liquid_rate
    }

    pub fn resv_rate(&self) -> f64 {
        self.resv_rate
    }

    pub fn bhp_limit(&self) -> f64 {
        self.bhp_limit
    }

    pub fn thp_limit(&self) -> f64 {
        self.thp_limit
    }

    pub fn bhp_history(&self) -> Option<f64> {
        self.bhp_history
    }

    pub fn thp_history(&self) -> Option<f64> {
        self.thp_history
    }

    pub fn vfp_table(&self) -> Option<u32> {
        self.vfp_table
    }

    /// Artificial lift quantity, in whatever unit the deck used.
    pub fn alq(&self) -> Option<f64> {
        self.alq
    }

    pub fn active_controls(&self) -> ControlSet {
        self.active_controls
    }

    pub fn current_control(&self) -> ControlMode {
        self.current_control
    }

    pub fn is_prediction(&self) -> bool {
        self.prediction_mode
    }

    pub fn has_control(&self, mode: ControlMode) -> bool {
        self.active_controls.contains(mode)
    }
}

impl std::fmt::Display for ProductionControls {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn opt<T: std::fmt::Display>(v: Option<T>) -> String {
            v.map_or_else(|| "-".to_string(), |v| v.to_string())
        }

        write!(
            f,
            "ProductionControls {{ oil rate: {}, water rate: {}, gas rate: {}, \
             liquid rate: {}, ResV rate: {}, BHP limit: {}, THP limit: {}, \
             BHPH: {}, THPH: {}, VFP table: {}, ALQ: {}, \
             controls: {}, current: {}, prediction: {} }}",
            self.oil_rate,
            self.water_rate,
            self.gas_rate,
            self.liquid_rate,
            self.resv_rate,
            self.bhp_limit,
            self.thp_limit,
            opt(self.bhp_history),
            opt(self.thp_history),
            opt(self.vfp_table),
            opt(self.alq),
            self.active_controls,
            self.current_control,
            self.prediction_mode,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_satisfies_invariants() {
        let p = ProductionControls::default();
        assert!(p.has_control(ControlMode::Bhp));
        assert!(p.has_control(p.current_control()));
        assert!(p.is_prediction());
        assert_eq!(p.vfp_table(), None);
        assert_eq!(p.alq(), None);
    }

    #[test]
    fn test_any_field_difference_breaks_equality() {
        let base = ProductionControls::default();
        assert_eq!(base, base.clone());

        let mut other = base.clone();
        other.alq = Some(1.0);
        assert_ne!(base, other);

        let mut other = base.clone();
        other.active_controls.insert(ControlMode::Orat);
        assert_ne!(base, other);

        let mut other = base.clone();
        other.prediction_mode = false;
        assert_ne!(base, other);

        let mut other = base.clone();
        other.bhp_history = Some(0.0);
        assert_ne!(base, other);
    }

    #[test]
    fn test_display_lists_every_field() {
        let text = ProductionControls::default().to_string();
        for label in [
            "oil rate", "water rate", "gas rate", "liquid rate", "ResV rate", "BHP limit",
            "THP limit", "BHPH", "THPH", "VFP table", "ALQ", "controls: {BHP}", "prediction: true",
        ] {
            assert!(text.contains(label), "missing '{label}' in {text}");
        }
    }

    // ------------------------------------------------------------------------
    // Deserialization guards
    // ------------------------------------------------------------------------

    fn stored_json(active: &str, current: &str, prediction: bool) -> String {
        format!(
            r#"{{"oil_rate":0.0,"water_rate":0.0,"gas_rate":0.0,"liquid_rate":0.0,
                "resv_rate":0.0,"bhp_limit":0.0,"thp_limit":0.0,"bhp_history":null,
                "thp_history":null,"vfp_table":null,"alq":null,
                "active_controls":{active},"current_control":"{current}",
                "prediction_mode":{prediction}}}"#
        )
    }

    #[test]
    fn test_deserialize_rejects_empty_active_set() {
        let json = stored_json("[]", "THP", false);
        let err = serde_json::from_str::<ProductionControls>(&json).unwrap_err();
        assert!(err.to_string().contains("do not include BHP"), "{err}");
    }

    #[test]
    fn test_deserialize_rejects_current_outside_active_set() {
        let json = stored_json(r#"["ORAT","BHP"]"#, "WRAT", true);
        let err = serde_json::from_str::<ProductionControls>(&json).unwrap_err();
        assert!(err.to_string().contains("not among the active controls"), "{err}");
    }

    #[test]
    fn test_deserialize_rejects_thp_controlled_history() {
        let json = stored_json(r#"["THP","BHP"]"#, "THP", false);
        let err = serde_json::from_str::<ProductionControls>(&json).unwrap_err();
        assert!(err.to_string().contains("historical state"), "{err}");

        // the same set is fine for a prediction state
        let json = stored_json(r#"["THP","BHP"]"#, "THP", true);
        let p: ProductionControls = serde_json::from_str(&json).unwrap();
        assert_eq!(p.current_control(), ControlMode::Thp);
    }

    #[test]
    fn test_default_state_survives_json() {
        let p = ProductionControls::default();
        let back: ProductionControls =
            serde_json::from_str(&serde_json::to_string(&p).unwrap()).unwrap();
        assert_eq!(back, p);
    }
}
