//! Domain model for health analytics records.
//!
//! # Responsibility
//! - Define the nine record types tracked by the store.
//! - Define closed enums, identity, and write-boundary validation.
//!
//! # Invariants
//! - Every stored record is identified by a `RecordId` assigned once.
//! - Calendar days are `chrono::NaiveDate`, serialized as `YYYY-MM-DD`.

pub mod allergy;
pub mod appointment;
pub mod doctor_protocol;
pub mod enums;
pub mod er_visit;
pub mod good_day;
pub mod id;
pub mod med_effect;
pub mod record;
pub mod trend;
pub mod trigger;
pub mod validation;
pub mod vital_alert;
