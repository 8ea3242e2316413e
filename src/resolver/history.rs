//! WCONHIST: control state from an observed production record

use tracing::{debug, warn};

use super::{lift_quantity, value_or_zero, vfp_table, ControlError, ControlResolver, WCONHIST};
use crate::record::{items, DeckRecord};
use crate::types::{ControlMode, ControlSet, ProductionControls};

impl ControlResolver {
    /// Resolve a historical production record.
    ///
    /// `previous` is `None` only for the first report step of the well, in
    /// which case the default state is used. `override_mode` is the WHISTCL
    /// control mode; when it is itself a valid historical control it wins
    /// over the record's CMODE.
    pub fn history(
        &self,
        previous: Option<&ProductionControls>,
        record: &impl DeckRecord,
        override_mode: Option<ControlMode>,
        switching_from_injector: bool,
    ) -> Result<ProductionControls, ControlError> {
        let initial = ProductionControls::default();
        let prev = previous.unwrap_or(&initial);

        let oil_rate = value_or_zero(record, items::ORAT);
        let water_rate = value_or_zero(record, items::WRAT);
        let gas_rate = value_or_zero(record, items::GRAT);

        let bhp_history = measured(record, items::BHP);
        let thp_history = measured(record, items::THP);

        if !record.has_value(items::CMODE) {
            return Err(ControlError::MissingControlMode { keyword: WCONHIST });
        }
        let cmode_text = record.text(items::CMODE).unwrap_or_default();
        let unsupported = || ControlError::UnsupportedControlMode {
            mode: cmode_text.to_string(),
            keyword: WCONHIST,
        };

        let stated: ControlMode = cmode_text.parse().map_err(|_| unsupported())?;
        let mode = match override_mode.filter(ControlMode::is_effective_history_control) {
            Some(whistcl) => {
                if whistcl != stated {
                    debug!(stated = %stated, whistcl = %whistcl, "WHISTCL overrides WCONHIST control mode");
                }
                whistcl
            }
            None if stated.is_effective_history_control() => stated,
            None => return Err(unsupported()),
        };

        let mut active_controls = ControlSet::new();
        active_controls.insert(mode);
        active_controls.insert(ControlMode::Bhp);

        let bhp_limit = if mode == ControlMode::Bhp {
            bhp_history.unwrap_or_else(|| {
                warn!("BHP controlled WCONHIST record has no measured BHP, limit set to 0");
                0.0
            })
        } else if prev.prediction_mode
            || switching_from_injector
            || prev.current_control == ControlMode::Bhp
        {
            debug!(
                from_prediction = prev.prediction_mode,
                switching_from_injector,
                previous_control = %prev.current_control,
                "BHP limit reset to default"
            );
            self.settings.default_bhp_limit
        } else {
            prev.bhp_limit
        };

        let vfp_table = vfp_table(record, items::HIST_VFP_TABLE, WCONHIST)?.or(prev.vfp_table);
        let alq = lift_quantity(record, items::HIST_LIFT).or(prev.alq);

        Ok(ProductionControls {
            oil_rate,
            water_rate,
            gas_rate,
            liquid_rate: water_rate + oil_rate,
            resv_rate: 0.0,
            bhp_limit,
            thp_limit: 0.0,
            bhp_history,
            thp_history,
            vfp_table,
            alq,
            active_controls,
            current_control: mode,
            prediction_mode: false,
        })
    }
}

fn measured(record: &impl DeckRecord, item: &str) -> Option<f64> {
    if record.has_value(item) {
        record.value(item)
    } else {
        None
    }
}
