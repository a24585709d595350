//! Positive-day journal entries.

use crate::model::record::{Collection, Record};
use crate::model::validation::{check_level, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodDay {
    pub date: NaiveDate,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quotes: Vec<String>,
    #[serde(default)]
    pub gratitude: Vec<String>,
    pub energy_level: u8,
    pub pain_level: u8,
    pub mood_level: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodDayPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quotes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gratitude: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pain_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_level: Option<u8>,
}

impl Record for GoodDay {
    type Patch = GoodDayPatch;

    const COLLECTION: Collection = Collection {
        table: "good_days",
        id_prefix: "goodday",
        index_columns: &[],
    };

    fn validate(&self) -> Result<(), ValidationError> {
        check_level("energyLevel", self.energy_level)?;
        check_level("painLevel", self.pain_level)?;
        check_level("moodLevel", self.mood_level)
    }

    fn record_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
}
