//! Emergency-room encounter records.

use crate::model::enums::ErOutcome;
use crate::model::record::{Collection, Record};
use crate::model::validation::{check_not_blank, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErVisit {
    pub date: NaiveDate,
    pub hospital: String,
    pub chief_complaint: String,
    pub diagnosis: String,
    pub treatment: String,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub follow_up: String,
    #[serde(default)]
    pub notes: String,
    /// Free-form length of stay, e.g. `6 hours`.
    #[serde(default)]
    pub duration: String,
    pub outcome: ErOutcome,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErVisitPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chief_complaint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medications: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ErOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<String>>,
}

impl Record for ErVisit {
    type Patch = ErVisitPatch;

    const COLLECTION: Collection = Collection {
        table: "er_visits",
        id_prefix: "er",
        index_columns: &[],
    };

    fn validate(&self) -> Result<(), ValidationError> {
        check_not_blank("hospital", &self.hospital)
    }

    fn record_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
}
