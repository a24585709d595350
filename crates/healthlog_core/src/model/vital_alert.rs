//! Out-of-range vital sign events.
//!
//! # Invariants
//! - Alerts are created unresolved.
//! - `resolved` only moves false -> true, through the resolve operation,
//!   which also records `action_taken`. The patch shape cannot touch either
//!   field.

use crate::model::enums::{AlertSeverity, VitalAlertKind};
use crate::model::record::{Collection, Record};
use crate::model::validation::{check_not_blank, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Index column holding `VitalAlertKind`.
pub const VITAL_ALERT_KIND_INDEX: &str = "kind";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalAlert {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: VitalAlertKind,
    /// Reading as entered, e.g. `168/102` or `88%`.
    pub value: String,
    pub threshold: String,
    pub severity: AlertSeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_taken: Option<String>,
    #[serde(default)]
    pub resolved: bool,
}

impl VitalAlert {
    /// Builds an unresolved alert.
    pub fn new(
        date: NaiveDate,
        kind: VitalAlertKind,
        value: impl Into<String>,
        threshold: impl Into<String>,
        severity: AlertSeverity,
    ) -> Self {
        Self {
            date,
            kind,
            value: value.into(),
            threshold: threshold.into(),
            severity,
            action_taken: None,
            resolved: false,
        }
    }

    /// Marks the alert resolved and records the action that resolved it.
    pub fn resolve(&mut self, action_taken: impl Into<String>) {
        self.resolved = true;
        self.action_taken = Some(action_taken.into());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalAlertPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<VitalAlertKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<AlertSeverity>,
}

impl Record for VitalAlert {
    type Patch = VitalAlertPatch;

    const COLLECTION: Collection = Collection {
        table: "vital_alerts",
        id_prefix: "alert",
        index_columns: &[VITAL_ALERT_KIND_INDEX],
    };

    fn validate(&self) -> Result<(), ValidationError> {
        check_not_blank("value", &self.value)
    }

    fn validate_new(&self) -> Result<(), ValidationError> {
        if self.resolved {
            return Err(ValidationError::CreatedResolved);
        }
        self.validate()
    }

    fn record_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }

    fn index_values(&self) -> Vec<String> {
        vec![self.kind.as_str().to_string()]
    }
}
