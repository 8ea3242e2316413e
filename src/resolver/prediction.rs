//! WCONPROD: control state from a target production record

use tracing::debug;

use super::{lift_quantity, value_or_zero, vfp_table, ControlError, ControlResolver, WCONPROD};
use crate::record::{items, DeckRecord};
use crate::types::{ControlMode, ControlSet, ProductionControls};

/// Limits that become available controls when stated explicitly, in the
/// order they are examined.
const STATED_LIMITS: [(&str, ControlMode); 6] = [
    (items::ORAT, ControlMode::Orat),
    (items::WRAT, ControlMode::Wrat),
    (items::GRAT, ControlMode::Grat),
    (items::LRAT, ControlMode::Lrat),
    (items::RESV, ControlMode::Resv),
    (items::THP, ControlMode::Thp),
];

impl ControlResolver {
    /// Resolve a predictive production record.
    ///
    /// `default_control` becomes the current control when the record carries
    /// no CMODE; it must be available like any stated mode.
    pub fn prediction(
        &self,
        record: &impl DeckRecord,
        add_group_control: bool,
        default_control: ControlMode,
    ) -> Result<ProductionControls, ControlError> {
        let thp_limit = value_or_zero(record, items::THP);
        let bhp_limit = record
            .value(items::BHP)
            .unwrap_or(self.settings.default_bhp_limit);

        let mut active_controls = ControlSet::new();
        for (item, mode) in STATED_LIMITS {
            if !record.has_value(item) {
                continue;
            }
            // zero THP means "no THP limit"
            if mode == ControlMode::Thp && thp_limit == 0.0 {
                debug!("zero THP limit ignored");
                continue;
            }
            active_controls.insert(mode);
        }
        active_controls.insert(ControlMode::Bhp);
        if add_group_control {
            active_controls.insert(ControlMode::Grup);
        }

        let current_control = if record.has_value(items::CMODE) {
            let text = record.text(items::CMODE).unwrap_or_default();
            let unavailable = || ControlError::UnavailableControlSelection {
                mode: text.to_string(),
            };
            let mode: ControlMode = text.parse().map_err(|_| unavailable())?;
            if !active_controls.contains(mode) {
                return Err(unavailable());
            }
            mode
        } else if active_controls.contains(default_control) {
            default_control
        } else {
            return Err(ControlError::UnavailableControlSelection {
                mode: default_control.to_string(),
            });
        };

        debug!(
            controls = %active_controls,
            current = %current_control,
            "WCONPROD controls resolved"
        );

        Ok(ProductionControls {
            oil_rate: value_or_zero(record, items::ORAT),
            water_rate: value_or_zero(record, items::WRAT),
            gas_rate: value_or_zero(record, items::GRAT),
            liquid_rate: value_or_zero(record, items::LRAT),
            resv_rate: value_or_zero(record, items::RESV),
            bhp_limit,
            thp_limit,
            bhp_history: None,
            thp_history: None,
            vfp_table: vfp_table(record, items::PRED_VFP_TABLE, WCONPROD)?,
            alq: lift_quantity(record, items::PRED_ALQ),
            active_controls,
            current_control,
            prediction_mode: true,
        })
    }
}
