//! Keyword Record Access
//!
//! The resolvers never parse deck text or convert units. They read an
//! already-normalized keyword record through the [`DeckRecord`] trait, which
//! answers three questions per item:
//!
//! - what is its SI value (stated by the user or filled in by the record layer)
//! - was it stated explicitly, as opposed to defaulted
//! - what is its trimmed text (for the CMODE directive)
//!
//! [`KeywordRecord`] is the in-memory implementation used by the sequence
//! replay, the CLI and the tests. In JSON/TOML a plain value is an explicit
//! item and `{ default = x }` marks a value the record layer defaulted:
//!
//! ```ignore
//! { "CMODE": "ORAT", "ORAT": 0.0023, "BHP": { "default": 101325.0 } }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Item names used by the production keywords
pub mod items {
    pub const ORAT: &str = "ORAT";
    pub const WRAT: &str = "WRAT";
    pub const GRAT: &str = "GRAT";
    pub const LRAT: &str = "LRAT";
    pub const RESV: &str = "RESV";
    pub const BHP: &str = "BHP";
    pub const THP: &str = "THP";
    pub const CMODE: &str = "CMODE";

    // WCONHIST spelling
    pub const HIST_VFP_TABLE: &str = "VFPTable";
    pub const HIST_LIFT: &str = "Lift";

    // WCONPROD spelling
    pub const PRED_VFP_TABLE: &str = "VFP_TABLE";
    pub const PRED_ALQ: &str = "ALQ";
}

/// Read-only access to one parsed keyword record.
pub trait DeckRecord {
    /// SI value of a numeric item. `None` when the item carries no value at
    /// all, neither stated nor defaulted.
    fn value(&self, item: &str) -> Option<f64>;

    /// True iff the user stated the item rather than leaving it defaulted.
    fn has_value(&self, item: &str) -> bool;

    /// Trimmed text of a string item.
    fn text(&self, item: &str) -> Option<&str>;

    /// Integer value of a numeric item. `None` when the item has no value or
    /// the value is not a whole number that fits an `i64`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn int_value(&self, item: &str) -> Option<i64> {
        self.value(item)
            .filter(|v| v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64)
            .map(|v| v as i64)
    }
}

// ============================================================================
// In-memory record
// ============================================================================

/// Raw value of a record item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemValue {
    Number(f64),
    Text(String),
}

/// A record item, tagged with whether the user stated it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordItem {
    Default { default: ItemValue },
    Explicit(ItemValue),
}

impl RecordItem {
    fn raw(&self) -> &ItemValue {
        match self {
            RecordItem::Default { default } => default,
            RecordItem::Explicit(value) => value,
        }
    }
}

/// Keyword record held in memory, keyed by item name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordRecord {
    items: HashMap<String, RecordItem>,
}

impl KeywordRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicitly stated numeric item
    pub fn with_value(mut self, item: &str, value: f64) -> Self {
        self.items
            .insert(item.to_string(), RecordItem::Explicit(ItemValue::Number(value)));
        self
    }

    /// Numeric item defaulted by the record layer
    pub fn with_default(mut self, item: &str, value: f64) -> Self {
        self.items.insert(
            item.to_string(),
            RecordItem::Default {
                default: ItemValue::Number(value),
            },
        );
        self
    }

    /// Explicitly stated text item
    pub fn with_text(mut self, item: &str, text: &str) -> Self {
        self.items.insert(
            item.to_string(),
            RecordItem::Explicit(ItemValue::Text(text.to_string())),
        );
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl DeckRecord for KeywordRecord {
    fn value(&self, item: &str) -> Option<f64> {
        match self.items.get(item)?.raw() {
            ItemValue::Number(v) => Some(*v),
            ItemValue::Text(_) => None,
        }
    }

    fn has_value(&self, item: &str) -> bool {
        matches!(self.items.get(item), Some(RecordItem::Explicit(_)))
    }

    fn text(&self, item: &str) -> Option<&str> {
        match self.items.get(item)?.raw() {
            ItemValue::Text(s) => Some(s.trim()),
            ItemValue::Number(_) => None,
        }
    }
}
