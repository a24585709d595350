//! Trend samples: one scalar value of a tracked metric on a calendar day.
//!
//! # Invariants
//! - Several samples of the same metric may share a day; storage never
//!   merges them.
//! - `value` is finite.

use crate::model::enums::MetricKind;
use crate::model::record::{Collection, Record};
use crate::model::validation::{check_finite, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Index column holding `MetricKind`.
pub const TREND_KIND_INDEX: &str = "kind";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendEntry {
    pub date: NaiveDate,
    /// Serialized as `type` to match the external record shape.
    #[serde(rename = "type")]
    pub kind: MetricKind,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TrendEntry {
    pub fn new(date: NaiveDate, kind: MetricKind, value: f64) -> Self {
        Self {
            date,
            kind,
            value,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendEntryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MetricKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// `Some(None)` clears the note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<Option<String>>,
}

impl Record for TrendEntry {
    type Patch = TrendEntryPatch;

    const COLLECTION: Collection = Collection {
        table: "trends",
        id_prefix: "trend",
        index_columns: &[TREND_KIND_INDEX],
    };

    fn validate(&self) -> Result<(), ValidationError> {
        check_finite("value", self.value)
    }

    fn record_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }

    fn index_values(&self) -> Vec<String> {
        vec![self.kind.as_str().to_string()]
    }
}
