//! First-run sample data.
//!
//! # Invariants
//! - `seed_sample_data` is not idempotent; each call appends a full set.
//! - `seed_if_empty` only seeds a store with no rows in any collection.

use crate::model::allergy::Allergy;
use crate::model::enums::{
    AllergyKind, AllergySeverity, MetricKind, TriggerCategory, TriggerFrequency,
};
use crate::model::good_day::GoodDay;
use crate::model::trend::TrendEntry;
use crate::model::trigger::Trigger;
use crate::repo::record_repo::{RecordRepository, RepoResult};
use crate::repo::store::HealthStore;
use chrono::{Duration, NaiveDate};
use log::info;
use rand::Rng;

/// Days of synthetic sleep/pain samples, ending today.
pub const SAMPLE_TREND_DAYS: i64 = 30;

/// Rows written by one seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub trends: usize,
    pub triggers: usize,
    pub good_days: usize,
    pub allergies: usize,
}

/// Writes a representative sample set into the store.
///
/// Sleep values are drawn from `5.0..9.0` hours and pain from `3.0..8.0`,
/// one of each per day for `SAMPLE_TREND_DAYS` days ending at `today`.
pub fn seed_sample_data<G: Rng + ?Sized>(
    store: &HealthStore<'_>,
    today: NaiveDate,
    rng: &mut G,
) -> RepoResult<SeedReport> {
    let mut report = SeedReport::default();

    for offset in 0..SAMPLE_TREND_DAYS {
        let Some(date) = today.checked_sub_signed(Duration::days(offset)) else {
            break;
        };
        store.trends.add(
            &TrendEntry::new(date, MetricKind::Sleep, rng.gen_range(5.0..9.0))
                .with_note("Sample sleep data"),
        )?;
        store.trends.add(
            &TrendEntry::new(date, MetricKind::Pain, rng.gen_range(3.0..8.0))
                .with_note("Sample pain data"),
        )?;
        report.trends += 2;
    }

    for trigger in sample_triggers() {
        store.triggers.add(&trigger)?;
        report.triggers += 1;
    }

    store.good_days.add(&sample_good_day(today))?;
    report.good_days += 1;

    for allergy in sample_allergies() {
        store.allergies.add(&allergy)?;
        report.allergies += 1;
    }

    info!(
        "event=seed module=seed status=ok trends={} triggers={} good_days={} allergies={}",
        report.trends, report.triggers, report.good_days, report.allergies
    );
    Ok(report)
}

/// Seeds only when every collection is empty.
///
/// Returns `None` when the store already holds data.
pub fn seed_if_empty<G: Rng + ?Sized>(
    store: &HealthStore<'_>,
    today: NaiveDate,
    rng: &mut G,
) -> RepoResult<Option<SeedReport>> {
    if !store.is_empty()? {
        info!("event=seed module=seed status=skipped reason=store_not_empty");
        return Ok(None);
    }
    seed_sample_data(store, today, rng).map(Some)
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

fn sample_triggers() -> Vec<Trigger> {
    vec![
        Trigger {
            name: "Bright fluorescent lights".to_string(),
            category: TriggerCategory::Sensory,
            symptoms: strings(&["Migraine", "Eye strain", "Dizziness"]),
            severity: 4,
            avoidance_strategies: strings(&[
                "Wear sunglasses indoors",
                "Request LED bulbs",
                "Sit away from overhead lights",
            ]),
            coping_strategies: strings(&[
                "Take breaks in dark room",
                "Use cold compress",
                "Medication as needed",
            ]),
            last_occurrence: None,
            frequency: TriggerFrequency::Weekly,
        },
        Trigger {
            name: "Dairy products".to_string(),
            category: TriggerCategory::Food,
            symptoms: strings(&["Stomach pain", "Bloating", "Fatigue"]),
            severity: 3,
            avoidance_strategies: strings(&[
                "Check all food labels",
                "Ask about ingredients",
                "Bring own snacks",
            ]),
            coping_strategies: strings(&["Take lactase enzyme", "Stay hydrated", "Rest"]),
            last_occurrence: None,
            frequency: TriggerFrequency::Rarely,
        },
    ]
}

fn sample_good_day(today: NaiveDate) -> GoodDay {
    GoodDay {
        date: today,
        title: "Great day with low pain!".to_string(),
        description: "Managed to go for a short walk and had energy for creative work"
            .to_string(),
        photos: Vec::new(),
        quotes: Vec::new(),
        gratitude: strings(&["Sunshine", "Supportive partner", "Good sleep last night"]),
        energy_level: 4,
        pain_level: 2,
        mood_level: 5,
    }
}

fn sample_allergies() -> Vec<Allergy> {
    vec![
        Allergy {
            name: "Penicillin".to_string(),
            kind: AllergyKind::Medication,
            reaction: "Severe rash and difficulty breathing".to_string(),
            severity: AllergySeverity::Anaphylaxis,
            date_discovered: None,
            notes: "MUST avoid all penicillin-based antibiotics".to_string(),
        },
        Allergy {
            name: "Latex".to_string(),
            kind: AllergyKind::Environmental,
            reaction: "Skin rash and itching".to_string(),
            severity: AllergySeverity::Moderate,
            date_discovered: None,
            notes: "Request non-latex gloves for medical procedures".to_string(),
        },
    ]
}
