//! Production control modes: the closed set of quantities that can limit a well

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Error returned when CMODE text names no known control mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown production control mode '{text}'")]
pub struct ParseControlModeError {
    pub text: String,
}

/// Physical quantity (rate, pressure or group directive) governing a producer.
///
/// No ordering is defined between modes; set membership is the only relation
/// the resolvers rely on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum ControlMode {
    /// Surface oil rate
    Orat,
    /// Surface water rate
    Wrat,
    /// Surface gas rate
    Grat,
    /// Surface liquid (oil + water) rate
    Lrat,
    /// Linearly combined rate
    Crat,
    /// Reservoir fluid volume rate
    Resv,
    /// Tubing head pressure
    Thp,
    /// Bottom hole pressure
    Bhp,
    /// Controlled by the group the well belongs to
    Grup,
}

impl ControlMode {
    /// Every mode, in declaration order.
    pub const ALL: [ControlMode; 9] = [
        ControlMode::Orat,
        ControlMode::Wrat,
        ControlMode::Grat,
        ControlMode::Lrat,
        ControlMode::Crat,
        ControlMode::Resv,
        ControlMode::Thp,
        ControlMode::Bhp,
        ControlMode::Grup,
    ];

    /// Deck keyword for this mode
    pub fn keyword(&self) -> &'static str {
        match self {
            ControlMode::Orat => "ORAT",
            ControlMode::Wrat => "WRAT",
            ControlMode::Grat => "GRAT",
            ControlMode::Lrat => "LRAT",
            ControlMode::Crat => "CRAT",
            ControlMode::Resv => "RESV",
            ControlMode::Thp => "THP",
            ControlMode::Bhp => "BHP",
            ControlMode::Grup => "GRUP",
        }
    }

    /// Whether this mode can govern a well under historical (WCONHIST) control.
    ///
    /// CRAT is deliberately not handled for history matching; THP and GRUP
    /// are never valid current controls for an observed producer.
    pub fn is_effective_history_control(&self) -> bool {
        match self {
            ControlMode::Lrat
            | ControlMode::Resv
            | ControlMode::Orat
            | ControlMode::Wrat
            | ControlMode::Grat
            | ControlMode::Bhp => true,
            ControlMode::Crat | ControlMode::Thp | ControlMode::Grup => false,
        }
    }

    /// Rate-type control (any surface or reservoir rate)
    pub fn is_rate_control(&self) -> bool {
        matches!(
            self,
            ControlMode::Orat
                | ControlMode::Wrat
                | ControlMode::Grat
                | ControlMode::Lrat
                | ControlMode::Crat
                | ControlMode::Resv
        )
    }

    /// Pressure-type control (BHP or THP)
    pub fn is_pressure_control(&self) -> bool {
        matches!(self, ControlMode::Bhp | ControlMode::Thp)
    }

    pub(crate) fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl FromStr for ControlMode {
    type Err = ParseControlModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ControlMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.keyword().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseControlModeError {
                text: trimmed.to_string(),
            })
    }
}

impl TryFrom<String> for ControlMode {
    type Error = ParseControlModeError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl std::fmt::Display for ControlMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_history_controls() {
        let effective: Vec<_> = ControlMode::ALL
            .iter()
            .filter(|m| m.is_effective_history_control())
            .copied()
            .collect();
        assert_eq!(
            effective,
            vec![
                ControlMode::Orat,
                ControlMode::Wrat,
                ControlMode::Grat,
                ControlMode::Lrat,
                ControlMode::Resv,
                ControlMode::Bhp,
            ]
        );
        assert!(!ControlMode::Thp.is_effective_history_control());
        assert!(!ControlMode::Grup.is_effective_history_control());
        assert!(!ControlMode::Crat.is_effective_history_control());
    }

    #[test]
    fn test_parse_trims_and_ignores_case() {
        assert_eq!(" orat ".parse::<ControlMode>(), Ok(ControlMode::Orat));
        assert_eq!("GRUP".parse::<ControlMode>(), Ok(ControlMode::Grup));
        assert_eq!("Bhp".parse::<ControlMode>(), Ok(ControlMode::Bhp));
    }

    #[test]
    fn test_parse_unknown_text_is_typed_error() {
        let err = "XRAT".parse::<ControlMode>().unwrap_err();
        assert_eq!(err.text, "XRAT");
        assert!(err.to_string().contains("XRAT"));
    }

    #[test]
    fn test_keyword_round_trips_through_display() {
        for mode in ControlMode::ALL {
            assert_eq!(mode.to_string().parse::<ControlMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_bits_are_distinct() {
        let mut seen = 0u16;
        for mode in ControlMode::ALL {
            assert_eq!(seen & mode.bit(), 0, "{mode} shares a bit");
            seen |= mode.bit();
        }
    }

    #[test]
    fn test_rate_and_pressure_partition() {
        for mode in ControlMode::ALL {
            let kinds = [mode.is_rate_control(), mode.is_pressure_control()];
            let n = kinds.iter().filter(|k| **k).count();
            if mode == ControlMode::Grup {
                assert_eq!(n, 0);
            } else {
                assert_eq!(n, 1, "{mode}");
            }
        }
    }

    #[test]
    fn test_deserialize_accepts_same_text_as_parse() {
        for text in ["\"resv\"", "\"Resv\"", "\" RESV \""] {
            let mode: ControlMode = serde_json::from_str(text).unwrap();
            assert_eq!(mode, ControlMode::Resv, "{text}");
        }
        assert!(serde_json::from_str::<ControlMode>("\"choke\"").is_err());
        assert_eq!(serde_json::to_string(&ControlMode::Resv).unwrap(), "\"RESV\"");
    }
}
