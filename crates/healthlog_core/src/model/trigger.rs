//! Known symptom triggers and how they are managed.

use crate::model::enums::{TriggerCategory, TriggerFrequency};
use crate::model::record::{Collection, Record};
use crate::model::validation::{check_level, check_not_blank, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Index column holding `TriggerCategory`.
pub const TRIGGER_CATEGORY_INDEX: &str = "category";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    pub name: String,
    pub category: TriggerCategory,
    #[serde(default)]
    pub symptoms: Vec<String>,
    /// 1 (mild) ..= 5 (severe).
    pub severity: u8,
    #[serde(default)]
    pub avoidance_strategies: Vec<String>,
    #[serde(default)]
    pub coping_strategies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_occurrence: Option<NaiveDate>,
    pub frequency: TriggerFrequency,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<TriggerCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoidance_strategies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coping_strategies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_occurrence: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<TriggerFrequency>,
}

impl Record for Trigger {
    type Patch = TriggerPatch;

    const COLLECTION: Collection = Collection {
        table: "triggers",
        id_prefix: "trigger",
        index_columns: &[TRIGGER_CATEGORY_INDEX],
    };

    fn validate(&self) -> Result<(), ValidationError> {
        check_not_blank("name", &self.name)?;
        check_level("severity", self.severity)
    }

    fn index_values(&self) -> Vec<String> {
        vec![self.category.as_str().to_string()]
    }
}
