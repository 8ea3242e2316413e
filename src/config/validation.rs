//! Config checks that never reject a file: misspelled keys and values that
//! parse and validate but are probably in the wrong unit.
//!
//! The set of accepted keys is not maintained by hand. It is read off the
//! serialized default [`ControlsConfig`], so a field added to the config is
//! known here as soon as it exists.

use std::collections::BTreeSet;

use super::defaults::{MAX_SUGGESTION_DISTANCE, SUSPICIOUS_BHP_LIMIT_PA};
use super::ControlsConfig;

/// Something in a config file that is accepted but worth a second look.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    /// Key that no config section reads, with the nearest known key if any.
    UnknownKey {
        key: String,
        suggestion: Option<String>,
    },
    /// Value above the range a Pascal quantity normally takes.
    SuspiciousPressure {
        key: &'static str,
        value: f64,
        threshold: f64,
    },
}

impl ValidationWarning {
    /// Dotted path of the key the warning is about
    pub fn key(&self) -> &str {
        match self {
            Self::UnknownKey { key, .. } => key,
            Self::SuspiciousPressure { key, .. } => key,
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::UnknownKey { suggestion, .. } => suggestion.as_deref(),
            Self::SuspiciousPressure { .. } => None,
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownKey { key, suggestion: None } => write!(f, "unknown config key '{key}'"),
            Self::UnknownKey {
                key,
                suggestion: Some(s),
            } => write!(f, "unknown config key '{key}', did you mean '{s}'?"),
            Self::SuspiciousPressure {
                key,
                value,
                threshold,
            } => write!(
                f,
                "{key} = {value:.0} Pa is above {threshold:.0} Pa, check that the value is in Pascal"
            ),
        }
    }
}

// ============================================================================
// Key Paths
// ============================================================================

/// Every dotted key path in a TOML document, tables included.
///
/// `{ a = { b = 1, c = 2 } }` gives `a`, `a.b` and `a.c`.
pub fn key_paths(document: &toml::Value) -> BTreeSet<String> {
    let mut paths = BTreeSet::new();
    let mut pending: Vec<(String, &toml::Value)> = vec![(String::new(), document)];

    while let Some((prefix, value)) = pending.pop() {
        let Some(table) = value.as_table() else {
            continue;
        };
        for (name, child) in table {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}.{name}")
            };
            paths.insert(path.clone());
            pending.push((path, child));
        }
    }
    paths
}

/// Key paths a `well_controls.toml` may contain.
pub fn known_config_keys() -> BTreeSet<String> {
    toml::Value::try_from(ControlsConfig::default())
        .map(|document| key_paths(&document))
        .unwrap_or_default()
}

// ============================================================================
// Suggestions
// ============================================================================

/// Levenshtein distance over chars, kept in a single row.
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == *cb {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

/// Closest known key within [`MAX_SUGGESTION_DISTANCE`] edits. Ties go to the
/// key that sorts first.
pub fn suggest_correction(unknown: &str, known: &BTreeSet<String>) -> Option<String> {
    known
        .iter()
        .map(|key| (edit_distance(unknown, key), key))
        .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, key)| key.clone())
}

// ============================================================================
// Checks
// ============================================================================

/// Warnings for every key in `raw_toml` that the config does not read.
///
/// Text that is not TOML gives no warnings; deserialization reports it.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(document) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    key_paths(&document)
        .into_iter()
        .filter(|key| !known.contains(key))
        .map(|key| ValidationWarning::UnknownKey {
            suggestion: suggest_correction(&key, &known),
            key,
        })
        .collect()
}

/// Values that pass [`ControlsConfig::validate`] but look like a unit slip.
pub fn validate_physical_ranges(config: &ControlsConfig) -> Vec<ValidationWarning> {
    let bhp = config.resolver.default_bhp_limit_pa;
    if bhp > SUSPICIOUS_BHP_LIMIT_PA {
        vec![ValidationWarning::SuspiciousPressure {
            key: "resolver.default_bhp_limit_pa",
            value: bhp,
            threshold: SUSPICIOUS_BHP_LIMIT_PA,
        }]
    } else {
        Vec::new()
    }
}
