//! Core of the healthlog self-tracking store.
//! This crate owns record invariants, persistence and analytics.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{
    default_log_level, init_logging, init_logging_to, init_stderr_logging, logging_status,
    LogTarget,
};
pub use model::allergy::{Allergy, AllergyPatch};
pub use model::appointment::{AppointmentNote, AppointmentNotePatch};
pub use model::doctor_protocol::{DoctorProtocol, DoctorProtocolPatch};
pub use model::enums::{
    AlertSeverity, AllergyKind, AllergySeverity, ErOutcome, MetricKind, TriggerCategory,
    TriggerFrequency, VitalAlertKind,
};
pub use model::er_visit::{ErVisit, ErVisitPatch};
pub use model::good_day::{GoodDay, GoodDayPatch};
pub use model::id::RecordId;
pub use model::med_effect::{MedEffectEntry, MedEffectPatch};
pub use model::record::{Collection, Record, Stored};
pub use model::trend::{TrendEntry, TrendEntryPatch};
pub use model::trigger::{Trigger, TriggerPatch};
pub use model::validation::ValidationError;
pub use model::vital_alert::{VitalAlert, VitalAlertPatch};
pub use repo::record_repo::{
    MissingRecordPolicy, RecordRepository, RepoError, RepoResult, SqliteRecordRepository,
};
pub use repo::store::{HealthStore, StoreCounts};
pub use service::correlation::{
    Correlation, CorrelationPoint, CorrelationService, Direction, SameDayPolicy, Strength,
    TrendSource,
};
pub use service::query_service::QueryService;
pub use service::seed::{seed_if_empty, seed_sample_data, SeedReport};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
