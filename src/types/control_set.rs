//! Set of available production controls, stored as a bitmask

use serde::{Deserialize, Serialize};

use super::ControlMode;

/// Controls a well may switch to as fallback limits.
///
/// Iteration follows the declaration order of [`ControlMode`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<ControlMode>", from = "Vec<ControlMode>")]
pub struct ControlSet {
    bits: u16,
}

impl ControlSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mode. Returns `true` if it was not already present.
    pub fn insert(&mut self, mode: ControlMode) -> bool {
        let added = !self.contains(mode);
        self.bits |= mode.bit();
        added
    }

    /// Remove a mode. Returns `true` if it was present.
    pub fn remove(&mut self, mode: ControlMode) -> bool {
        let present = self.contains(mode);
        self.bits &= !mode.bit();
        present
    }

    pub fn contains(&self, mode: ControlMode) -> bool {
        self.bits & mode.bit() != 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = ControlMode> + '_ {
        ControlMode::ALL
            .into_iter()
            .filter(move |mode| self.contains(*mode))
    }
}

impl FromIterator<ControlMode> for ControlSet {
    fn from_iter<I: IntoIterator<Item = ControlMode>>(iter: I) -> Self {
        let mut set = ControlSet::new();
        for mode in iter {
            set.insert(mode);
        }
        set
    }
}

impl From<Vec<ControlMode>> for ControlSet {
    fn from(modes: Vec<ControlMode>) -> Self {
        modes.into_iter().collect()
    }
}

impl From<ControlSet> for Vec<ControlMode> {
    fn from(set: ControlSet) -> Self {
        set.iter().collect()
    }
}

impl std::fmt::Display for ControlSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, mode) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{mode}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove_report_changes() {
        let mut set = ControlSet::new();
        assert!(set.is_empty());
        assert!(set.insert(ControlMode::Bhp));
        assert!(!set.insert(ControlMode::Bhp));
        assert_eq!(set.len(), 1);
        assert!(set.remove(ControlMode::Bhp));
        assert!(!set.remove(ControlMode::Bhp));
        assert!(set.is_empty());
    }

    #[test]
    fn test_iteration_uses_declaration_order() {
        let set: ControlSet = [ControlMode::Grup, ControlMode::Bhp, ControlMode::Orat]
            .into_iter()
            .collect();
        let modes: Vec<_> = set.iter().collect();
        assert_eq!(
            modes,
            vec![ControlMode::Orat, ControlMode::Bhp, ControlMode::Grup]
        );
        assert_eq!(set.to_string(), "{ORAT, BHP, GRUP}");
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a: ControlSet = [ControlMode::Bhp, ControlMode::Resv].into_iter().collect();
        let b: ControlSet = [ControlMode::Resv, ControlMode::Bhp].into_iter().collect();
        assert_eq!(a, b);
        let c: ControlSet = [ControlMode::Bhp].into_iter().collect();
        assert_ne!(a, c);
    }

    #[test]
    fn test_serializes_as_mode_list() {
        let set: ControlSet = [ControlMode::Lrat, ControlMode::Bhp].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["LRAT","BHP"]"#);
        let back: ControlSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
