//! Known allergies and intolerances.

use crate::model::enums::{AllergyKind, AllergySeverity};
use crate::model::record::{Collection, Record};
use crate::model::validation::{check_not_blank, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allergy {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AllergyKind,
    pub reaction: String,
    pub severity: AllergySeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_discovered: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllergyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<AllergyKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<AllergySeverity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_discovered: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Record for Allergy {
    type Patch = AllergyPatch;

    const COLLECTION: Collection = Collection {
        table: "allergies",
        id_prefix: "allergy",
        index_columns: &[],
    };

    fn validate(&self) -> Result<(), ValidationError> {
        check_not_blank("name", &self.name)
    }
}
