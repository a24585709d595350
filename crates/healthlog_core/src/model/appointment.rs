//! Clinical appointment notes.

use crate::model::record::{Collection, Record};
use crate::model::validation::{check_level, check_not_blank, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Index column holding the doctor name (exact match).
pub const APPOINTMENT_DOCTOR_INDEX: &str = "doctor";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentNote {
    pub date: NaiveDate,
    pub doctor: String,
    pub specialty: String,
    pub reason: String,
    #[serde(default)]
    pub questions_asked: Vec<String>,
    #[serde(default)]
    pub answers_received: Vec<String>,
    #[serde(default)]
    pub tests_ordered: Vec<String>,
    #[serde(default)]
    pub prescriptions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
    /// 1 (poor) ..= 5 (excellent).
    pub satisfaction: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentNotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions_asked: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answers_received: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tests_ordered: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescriptions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub satisfaction: Option<u8>,
}

impl Record for AppointmentNote {
    type Patch = AppointmentNotePatch;

    const COLLECTION: Collection = Collection {
        table: "appointment_notes",
        id_prefix: "appt",
        index_columns: &[APPOINTMENT_DOCTOR_INDEX],
    };

    fn validate(&self) -> Result<(), ValidationError> {
        check_not_blank("doctor", &self.doctor)?;
        check_level("satisfaction", self.satisfaction)
    }

    fn record_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }

    fn index_values(&self) -> Vec<String> {
        vec![self.doctor.clone()]
    }
}
