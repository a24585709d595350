//! Scoped reads over the health record store.
//!
//! # Responsibility
//! - Windowed trend queries that feed the correlation engine.
//! - Named filtered queries and listings consumed by UI callers.
//! - Alert resolution (the only write exposed here).
//!
//! # Invariants
//! - Queries never fail on empty results; only storage errors propagate.
//! - Trend windows are inclusive `[today - window_days, today]`; a window
//!   of zero or less yields nothing.

use crate::model::allergy::Allergy;
use crate::model::appointment::{AppointmentNote, APPOINTMENT_DOCTOR_INDEX};
use crate::model::doctor_protocol::{DoctorProtocol, DOCTOR_PROTOCOL_NAME_INDEX};
use crate::model::enums::{MetricKind, TriggerCategory, VitalAlertKind};
use crate::model::er_visit::ErVisit;
use crate::model::good_day::GoodDay;
use crate::model::id::RecordId;
use crate::model::med_effect::{MedEffectEntry, MED_EFFECT_MEDICATION_INDEX};
use crate::model::record::Stored;
use crate::model::trend::{TrendEntry, TREND_KIND_INDEX};
use crate::model::trigger::{Trigger, TRIGGER_CATEGORY_INDEX};
use crate::model::vital_alert::{VitalAlert, VITAL_ALERT_KIND_INDEX};
use crate::repo::record_repo::{MissingRecordPolicy, RecordRepository, RepoError, RepoResult};
use crate::repo::store::HealthStore;
use crate::service::local_today;
use chrono::{Duration, NaiveDate};
use log::info;

/// Read-side facade over a `HealthStore`.
#[derive(Clone, Copy)]
pub struct QueryService<'s, 'conn> {
    store: &'s HealthStore<'conn>,
}

impl<'s, 'conn> QueryService<'s, 'conn> {
    pub fn new(store: &'s HealthStore<'conn>) -> Self {
        Self { store }
    }

    /// Trend samples of `kind` within the trailing window ending today
    /// (local calendar day), most-recent-first.
    pub fn trends_by_type(
        &self,
        kind: MetricKind,
        window_days: i64,
    ) -> RepoResult<Vec<Stored<TrendEntry>>> {
        self.trends_by_type_as_of(kind, window_days, local_today())
    }

    /// Same as `trends_by_type` with an explicit reference day.
    ///
    /// Samples dated after `today` are excluded. Same-day samples keep
    /// insertion order.
    pub fn trends_by_type_as_of(
        &self,
        kind: MetricKind,
        window_days: i64,
        today: NaiveDate,
    ) -> RepoResult<Vec<Stored<TrendEntry>>> {
        let Some(from) = window_start(today, window_days) else {
            return Ok(Vec::new());
        };
        self.store
            .trends
            .find_by_index_between(TREND_KIND_INDEX, kind.as_str(), from, today)
    }

    /// Medication effects for an exact medication name, in insertion order.
    pub fn med_effects_by_medication(
        &self,
        medication: &str,
    ) -> RepoResult<Vec<Stored<MedEffectEntry>>> {
        self.store
            .med_effects
            .find_by_index(MED_EFFECT_MEDICATION_INDEX, medication)
    }

    /// Appointment notes for an exact doctor name, in insertion order.
    pub fn appointments_by_doctor(&self, doctor: &str) -> RepoResult<Vec<Stored<AppointmentNote>>> {
        self.store
            .appointments
            .find_by_index(APPOINTMENT_DOCTOR_INDEX, doctor)
    }

    /// Alerts not yet resolved, most-recent-first.
    pub fn unresolved_vital_alerts(&self) -> RepoResult<Vec<Stored<VitalAlert>>> {
        let alerts = self.store.vital_alerts.list_all()?;
        Ok(alerts.into_iter().filter(|alert| !alert.resolved).collect())
    }

    pub fn vital_alerts_by_type(&self, kind: VitalAlertKind) -> RepoResult<Vec<Stored<VitalAlert>>> {
        self.store
            .vital_alerts
            .find_by_index(VITAL_ALERT_KIND_INDEX, kind.as_str())
    }

    /// Marks an alert resolved and records the action taken.
    ///
    /// A missing ID follows the store's `MissingRecordPolicy`.
    pub fn resolve_alert(&self, id: &RecordId, action_taken: &str) -> RepoResult<()> {
        let repo = &self.store.vital_alerts;
        let Some(mut alert) = repo.get(id)? else {
            return match repo.policy() {
                MissingRecordPolicy::Strict => Err(RepoError::NotFound(id.clone())),
                MissingRecordPolicy::Lenient => Ok(()),
            };
        };

        alert.record.resolve(action_taken);
        repo.replace(id, &alert.record)?;

        info!(
            "event=alert_resolved module=query status=ok id={} kind={}",
            id, alert.kind
        );
        Ok(())
    }

    pub fn all_triggers(&self) -> RepoResult<Vec<Stored<Trigger>>> {
        self.store.triggers.list_all()
    }

    pub fn triggers_by_category(
        &self,
        category: TriggerCategory,
    ) -> RepoResult<Vec<Stored<Trigger>>> {
        self.store
            .triggers
            .find_by_index(TRIGGER_CATEGORY_INDEX, category.as_str())
    }

    pub fn all_good_days(&self) -> RepoResult<Vec<Stored<GoodDay>>> {
        self.store.good_days.list_all()
    }

    pub fn all_allergies(&self) -> RepoResult<Vec<Stored<Allergy>>> {
        self.store.allergies.list_all()
    }

    pub fn all_doctor_protocols(&self) -> RepoResult<Vec<Stored<DoctorProtocol>>> {
        self.store.doctor_protocols.list_all()
    }

    pub fn doctor_protocols_by_doctor(
        &self,
        doctor_name: &str,
    ) -> RepoResult<Vec<Stored<DoctorProtocol>>> {
        self.store
            .doctor_protocols
            .find_by_index(DOCTOR_PROTOCOL_NAME_INDEX, doctor_name)
    }

    pub fn all_er_visits(&self) -> RepoResult<Vec<Stored<ErVisit>>> {
        self.store.er_visits.list_all()
    }

    pub fn all_med_effects(&self) -> RepoResult<Vec<Stored<MedEffectEntry>>> {
        self.store.med_effects.list_all()
    }

    pub fn all_appointments(&self) -> RepoResult<Vec<Stored<AppointmentNote>>> {
        self.store.appointments.list_all()
    }
}

/// First day of an inclusive trailing window, or `None` for empty windows.
///
/// Windows reaching past the earliest representable day are clamped.
pub fn window_start(today: NaiveDate, window_days: i64) -> Option<NaiveDate> {
    if window_days <= 0 {
        return None;
    }
    let start = Duration::try_days(window_days)
        .and_then(|span| today.checked_sub_signed(span))
        .unwrap_or(NaiveDate::MIN);
    Some(start)
}

#[cfg(test)]
mod tests {
    use super::window_start;
    use chrono::NaiveDate;

    fn day(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn window_start_is_inclusive_span() {
        assert_eq!(window_start(day("2025-01-31"), 30), Some(day("2025-01-01")));
        assert_eq!(window_start(day("2025-03-01"), 1), Some(day("2025-02-28")));
    }

    #[test]
    fn non_positive_window_is_empty() {
        assert_eq!(window_start(day("2025-01-31"), 0), None);
        assert_eq!(window_start(day("2025-01-31"), -7), None);
    }

    #[test]
    fn huge_window_clamps_instead_of_overflowing() {
        assert_eq!(window_start(day("2025-01-31"), i64::MAX), Some(NaiveDate::MIN));
    }
}
