//! Observed effects of a medication dose.

use crate::model::record::{Collection, Record};
use crate::model::validation::{check_level, check_not_blank, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Index column holding the medication name (exact match).
pub const MED_EFFECT_MEDICATION_INDEX: &str = "medication";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedEffectEntry {
    pub date: NaiveDate,
    pub medication: String,
    pub dosage: String,
    #[serde(default)]
    pub effects_positive: Vec<String>,
    #[serde(default)]
    pub effects_negative: Vec<String>,
    /// 1 (mild) ..= 5 (severe).
    pub severity: u8,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedEffectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medication: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effects_positive: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effects_negative: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Record for MedEffectEntry {
    type Patch = MedEffectPatch;

    const COLLECTION: Collection = Collection {
        table: "med_effects",
        id_prefix: "medeffect",
        index_columns: &[MED_EFFECT_MEDICATION_INDEX],
    };

    fn validate(&self) -> Result<(), ValidationError> {
        check_not_blank("medication", &self.medication)?;
        check_level("severity", self.severity)
    }

    fn record_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }

    fn index_values(&self) -> Vec<String> {
        vec![self.medication.clone()]
    }
}
