//! Report-step sequence for a single well
//!
//! Each step's state is resolved against the state of the step before it, so
//! steps must be applied strictly in report order. [`ControlSequence`] owns
//! that ordering for callers replaying one well: a step is only appended once
//! it resolved successfully, and a failing step leaves the sequence untouched.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::record::{items, DeckRecord, KeywordRecord};
use crate::resolver::{ControlError, ControlResolver};
use crate::types::{ControlMode, ProductionControls};

/// One production keyword applied to the well at a report step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "keyword")]
pub enum ControlStep {
    #[serde(rename = "WCONHIST")]
    History {
        record: KeywordRecord,
        /// Control mode from a WHISTCL directive in effect at this step
        #[serde(default, rename = "whistcl")]
        override_mode: Option<ControlMode>,
        #[serde(default)]
        switching_from_injector: bool,
    },
    #[serde(rename = "WCONPROD")]
    Prediction {
        record: KeywordRecord,
        #[serde(default)]
        group_control: bool,
    },
}

impl ControlStep {
    pub fn keyword(&self) -> &'static str {
        match self {
            ControlStep::History { .. } => crate::resolver::WCONHIST,
            ControlStep::Prediction { .. } => crate::resolver::WCONPROD,
        }
    }
}

/// Input for replaying a well: its name and its steps in report order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlSchedule {
    pub well: String,
    #[serde(default)]
    pub steps: Vec<ControlStep>,
}

/// Resolved control states of one well, oldest first
#[derive(Debug, Clone)]
pub struct ControlSequence {
    well: String,
    resolver: ControlResolver,
    states: Vec<ProductionControls>,
}

impl ControlSequence {
    pub fn new(well: impl Into<String>, resolver: ControlResolver) -> Self {
        Self {
            well: well.into(),
            resolver,
            states: Vec::new(),
        }
    }

    pub fn well(&self) -> &str {
        &self.well
    }

    pub fn states(&self) -> &[ProductionControls] {
        &self.states
    }

    pub fn latest(&self) -> Option<&ProductionControls> {
        self.states.last()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Resolve `step` against the latest state and append the result.
    ///
    /// A WCONPROD record without CMODE keeps the previous current control
    /// when the new record still offers it, and falls back to BHP otherwise.
    pub fn apply(&mut self, step: &ControlStep) -> Result<&ProductionControls, ControlError> {
        let previous = self.states.last();
        let resolved = match step {
            ControlStep::History {
                record,
                override_mode,
                switching_from_injector,
            } => self
                .resolver
                .history(previous, record, *override_mode, *switching_from_injector)?,
            ControlStep::Prediction {
                record,
                group_control,
            } => {
                let keep = previous.map_or(ControlMode::Bhp, ProductionControls::current_control);
                match self.resolver.prediction(record, *group_control, keep) {
                    Err(ControlError::UnavailableControlSelection { .. })
                        if keep != ControlMode::Bhp && !record.has_value(items::CMODE) =>
                    {
                        debug!(well = %self.well, previous = %keep, "previous control no longer available, falling back to BHP");
                        self.resolver
                            .prediction(record, *group_control, ControlMode::Bhp)?
                    }
                    other => other?,
                }
            }
        };

        info!(
            well = %self.well,
            step = self.states.len() + 1,
            keyword = step.keyword(),
            control = %resolved.current_control(),
            bhp_limit = resolved.bhp_limit(),
            "production controls resolved"
        );
        self.states.push(resolved);
        Ok(&self.states[self.states.len() - 1])
    }

    /// Apply every step in order, stopping at the first failure.
    ///
    /// On failure the error is returned together with the index of the
    /// offending step; states of the steps before it are kept.
    pub fn apply_all<'a, I>(&mut self, steps: I) -> Result<(), (usize, ControlError)>
    where
        I: IntoIterator<Item = &'a ControlStep>,
    {
        for (index, step) in steps.into_iter().enumerate() {
            self.apply(step).map_err(|e| (index, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_BHP_LIMIT;

    fn hist(cmode: &str) -> ControlStep {
        ControlStep::History {
            record: KeywordRecord::new()
                .with_text(items::CMODE, cmode)
                .with_value(items::ORAT, 0.01)
                .with_value(items::WRAT, 0.002),
            override_mode: None,
            switching_from_injector: false,
        }
    }

    #[test]
    fn test_failed_step_leaves_sequence_unchanged() {
        let mut seq = ControlSequence::new("OP_1", ControlResolver::default());
        seq.apply(&hist("ORAT")).unwrap();
        let err = seq.apply(&hist("THP")).unwrap_err();
        assert!(matches!(err, ControlError::UnsupportedControlMode { .. }));
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.latest().unwrap().current_control(), ControlMode::Orat);
    }

    #[test]
    fn test_prediction_keeps_previous_control_when_available() {
        let mut seq = ControlSequence::new("OP_1", ControlResolver::default());
        seq.apply(&ControlStep::Prediction {
            record: KeywordRecord::new()
                .with_value(items::ORAT, 0.01)
                .with_text(items::CMODE, "ORAT"),
            group_control: false,
        })
        .unwrap();

        let p = seq
            .apply(&ControlStep::Prediction {
                record: KeywordRecord::new().with_value(items::ORAT, 0.02),
                group_control: false,
            })
            .unwrap();
        assert_eq!(p.current_control(), ControlMode::Orat);

        let p = seq
            .apply(&ControlStep::Prediction {
                record: KeywordRecord::new().with_value(items::WRAT, 0.02),
                group_control: false,
            })
            .unwrap();
        assert_eq!(p.current_control(), ControlMode::Bhp);
    }

    #[test]
    fn test_history_after_prediction_resets_bhp_limit() {
        let mut seq = ControlSequence::new("OP_1", ControlResolver::default());
        seq.apply(&ControlStep::Prediction {
            record: KeywordRecord::new()
                .with_value(items::RESV, 0.3)
                .with_value(items::BHP, 70e5)
                .with_text(items::CMODE, "RESV"),
            group_control: true,
        })
        .unwrap();
        let p = seq.apply(&hist("RESV")).unwrap();
        assert_eq!(p.bhp_limit(), DEFAULT_BHP_LIMIT);
        assert!(!p.is_prediction());
    }

    #[test]
    fn test_apply_all_reports_failing_index() {
        let steps = vec![hist("ORAT"), hist("LRAT"), hist("GRUP"), hist("ORAT")];
        let mut seq = ControlSequence::new("OP_2", ControlResolver::default());
        let (index, _) = seq.apply_all(&steps).unwrap_err();
        assert_eq!(index, 2);
        assert_eq!(seq.len(), 2);
    }

    #[test]
    fn test_schedule_deserializes_from_json() {
        let json = r#"{
            "well": "OP_1",
            "steps": [
                { "keyword": "WCONHIST", "whistcl": "RESV",
                  "record": { "CMODE": "ORAT", "ORAT": 0.01 } },
                { "keyword": "WCONPROD", "group_control": true,
                  "record": { "CMODE": "GRUP", "BHP": { "default": 101325.0 } } }
            ]
        }"#;
        let schedule: ControlSchedule = serde_json::from_str(json).unwrap();
        assert_eq!(schedule.well, "OP_1");
        assert_eq!(schedule.steps.len(), 2);
        assert!(matches!(
            schedule.steps[0],
            ControlStep::History {
                override_mode: Some(ControlMode::Resv),
                switching_from_injector: false,
                ..
            }
        ));

        let mut seq = ControlSequence::new(&schedule.well, ControlResolver::default());
        seq.apply_all(&schedule.steps).unwrap();
        assert_eq!(seq.states()[0].current_control(), ControlMode::Resv);
        assert_eq!(seq.states()[1].current_control(), ControlMode::Grup);
    }
}
