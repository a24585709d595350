//! Health record store: one repository per collection over a shared
//! connection.
//!
//! # Responsibility
//! - Construct all nine collection repositories with one missing-ID policy.
//! - Act as the explicit store object handed to query/correlation/seed
//!   services (no process-wide handle).
//!
//! # Invariants
//! - All repositories borrow the same migrated connection.

use crate::model::allergy::Allergy;
use crate::model::appointment::AppointmentNote;
use crate::model::doctor_protocol::DoctorProtocol;
use crate::model::er_visit::ErVisit;
use crate::model::good_day::GoodDay;
use crate::model::med_effect::MedEffectEntry;
use crate::model::trend::TrendEntry;
use crate::model::trigger::Trigger;
use crate::model::vital_alert::VitalAlert;
use crate::repo::record_repo::{
    MissingRecordPolicy, RecordRepository, RepoResult, SqliteRecordRepository,
};
use rusqlite::Connection;

/// Repository bundle for every health record collection.
pub struct HealthStore<'conn> {
    pub trends: SqliteRecordRepository<'conn, TrendEntry>,
    pub er_visits: SqliteRecordRepository<'conn, ErVisit>,
    pub med_effects: SqliteRecordRepository<'conn, MedEffectEntry>,
    pub appointments: SqliteRecordRepository<'conn, AppointmentNote>,
    pub triggers: SqliteRecordRepository<'conn, Trigger>,
    pub good_days: SqliteRecordRepository<'conn, GoodDay>,
    pub vital_alerts: SqliteRecordRepository<'conn, VitalAlert>,
    pub doctor_protocols: SqliteRecordRepository<'conn, DoctorProtocol>,
    pub allergies: SqliteRecordRepository<'conn, Allergy>,
}

/// Row counts per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub trends: u64,
    pub er_visits: u64,
    pub med_effects: u64,
    pub appointments: u64,
    pub triggers: u64,
    pub good_days: u64,
    pub vital_alerts: u64,
    pub doctor_protocols: u64,
    pub allergies: u64,
}

impl StoreCounts {
    pub fn total(&self) -> u64 {
        self.trends
            + self.er_visits
            + self.med_effects
            + self.appointments
            + self.triggers
            + self.good_days
            + self.vital_alerts
            + self.doctor_protocols
            + self.allergies
    }
}

impl<'conn> HealthStore<'conn> {
    /// Builds the store over a connection returned by `open_db*`.
    pub fn try_new(conn: &'conn Connection, policy: MissingRecordPolicy) -> RepoResult<Self> {
        Ok(Self {
            trends: SqliteRecordRepository::try_new(conn, policy)?,
            er_visits: SqliteRecordRepository::try_new(conn, policy)?,
            med_effects: SqliteRecordRepository::try_new(conn, policy)?,
            appointments: SqliteRecordRepository::try_new(conn, policy)?,
            triggers: SqliteRecordRepository::try_new(conn, policy)?,
            good_days: SqliteRecordRepository::try_new(conn, policy)?,
            vital_alerts: SqliteRecordRepository::try_new(conn, policy)?,
            doctor_protocols: SqliteRecordRepository::try_new(conn, policy)?,
            allergies: SqliteRecordRepository::try_new(conn, policy)?,
        })
    }

    pub fn counts(&self) -> RepoResult<StoreCounts> {
        Ok(StoreCounts {
            trends: self.trends.count()?,
            er_visits: self.er_visits.count()?,
            med_effects: self.med_effects.count()?,
            appointments: self.appointments.count()?,
            triggers: self.triggers.count()?,
            good_days: self.good_days.count()?,
            vital_alerts: self.vital_alerts.count()?,
            doctor_protocols: self.doctor_protocols.count()?,
            allergies: self.allergies.count()?,
        })
    }

    pub fn is_empty(&self) -> RepoResult<bool> {
        Ok(self.counts()?.total() == 0)
    }
}
