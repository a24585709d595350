//! Per-doctor visit preparation templates.

use crate::model::record::{Collection, Record};
use crate::model::validation::{check_not_blank, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Index column holding the doctor name (exact match).
pub const DOCTOR_PROTOCOL_NAME_INDEX: &str = "doctor_name";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProtocol {
    pub doctor_name: String,
    pub specialty: String,
    #[serde(default)]
    pub prep_checklist: Vec<String>,
    #[serde(default)]
    pub standard_questions: Vec<String>,
    #[serde(default)]
    pub labs_to_request: Vec<String>,
    #[serde(default)]
    pub tips_for_visit: Vec<String>,
    /// Things the patient will not accept during a visit.
    #[serde(default)]
    pub boundaries: Vec<String>,
    pub last_updated: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProtocolPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_checklist: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_questions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labs_to_request: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tips_for_visit: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundaries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<NaiveDate>,
}

impl Record for DoctorProtocol {
    type Patch = DoctorProtocolPatch;

    const COLLECTION: Collection = Collection {
        table: "doctor_protocols",
        id_prefix: "protocol",
        index_columns: &[DOCTOR_PROTOCOL_NAME_INDEX],
    };

    fn validate(&self) -> Result<(), ValidationError> {
        check_not_blank("doctorName", &self.doctor_name)
    }

    fn index_values(&self) -> Vec<String> {
        vec![self.doctor_name.clone()]
    }
}
