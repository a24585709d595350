use chrono::NaiveDate;
use healthlog_core::db::migrations::latest_version;
use healthlog_core::db::{open_db, open_db_in_memory};
use healthlog_core::{
    AlertSeverity, Allergy, AllergyKind, AllergyPatch, AllergySeverity, AppointmentNote,
    DoctorProtocol, DoctorProtocolPatch, ErOutcome, ErVisit, ErVisitPatch, GoodDay,
    MedEffectEntry, MedEffectPatch, MetricKind, MissingRecordPolicy, RecordId, RecordRepository,
    RepoError, SqliteRecordRepository, TrendEntry, TrendEntryPatch, Trigger, TriggerCategory,
    TriggerFrequency, TriggerPatch, ValidationError, VitalAlert, VitalAlertKind,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rusqlite::Connection;

fn day(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

fn trend_repo(conn: &Connection) -> SqliteRecordRepository<'_, TrendEntry> {
    SqliteRecordRepository::try_new(conn, MissingRecordPolicy::Strict).unwrap()
}

fn er_visit() -> ErVisit {
    ErVisit {
        date: day("2025-02-10"),
        hospital: "St. Mary".to_string(),
        chief_complaint: "Syncope".to_string(),
        diagnosis: "POTS flare".to_string(),
        treatment: "IV fluids".to_string(),
        medications: vec!["Saline 1L".to_string()],
        follow_up: "Cardiology in 2 weeks".to_string(),
        notes: String::new(),
        duration: "5 hours".to_string(),
        outcome: ErOutcome::Discharged,
        documents: Vec::new(),
    }
}

fn med_effect(date: &str, medication: &str) -> MedEffectEntry {
    MedEffectEntry {
        date: day(date),
        medication: medication.to_string(),
        dosage: "10mg".to_string(),
        effects_positive: vec!["Less dizziness".to_string()],
        effects_negative: vec!["Headache".to_string()],
        severity: 2,
        notes: String::new(),
    }
}

fn trigger(name: &str, category: TriggerCategory) -> Trigger {
    Trigger {
        name: name.to_string(),
        category,
        symptoms: vec!["Migraine".to_string()],
        severity: 3,
        avoidance_strategies: Vec::new(),
        coping_strategies: Vec::new(),
        last_occurrence: None,
        frequency: TriggerFrequency::Weekly,
    }
}

fn allergy(name: &str) -> Allergy {
    Allergy {
        name: name.to_string(),
        kind: AllergyKind::Food,
        reaction: "Hives".to_string(),
        severity: AllergySeverity::Mild,
        date_discovered: Some(day("2019-06-01")),
        notes: String::new(),
    }
}

#[test]
fn add_then_get_round_trips_every_field() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRecordRepository<'_, ErVisit> =
        SqliteRecordRepository::try_new(&conn, MissingRecordPolicy::Strict).unwrap();

    let visit = er_visit();
    let id = repo.add(&visit).unwrap();

    let loaded = repo.get(&id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.record, visit);
}

#[test]
fn trend_round_trip_preserves_fractional_value_and_note() {
    let conn = open_db_in_memory().unwrap();
    let repo = trend_repo(&conn);

    let entry = TrendEntry::new(day("2025-01-01"), MetricKind::Sodium, 2312.75).with_note("salty");
    let id = repo.add(&entry).unwrap();

    assert_eq!(repo.get(&id).unwrap().unwrap().record, entry);
}

#[test]
fn trend_values_round_trip_bit_for_bit() {
    let conn = open_db_in_memory().unwrap();
    let repo = trend_repo(&conn);
    let mut rng = StdRng::seed_from_u64(7);

    let written: Vec<(RecordId, f64)> = (0..5000)
        .map(|_| {
            let value = rng.gen_range(5.0..9.0);
            let id = repo
                .add(&TrendEntry::new(day("2025-01-01"), MetricKind::Sleep, value))
                .unwrap();
            (id, value)
        })
        .collect();

    let mismatches: Vec<(f64, f64)> = written
        .iter()
        .map(|(id, value)| (*value, repo.get(id).unwrap().unwrap().value))
        .filter(|(expected, actual)| expected.to_bits() != actual.to_bits())
        .collect();
    assert!(mismatches.is_empty(), "values changed in storage: {mismatches:?}");
}

#[test]
fn ids_are_assigned_per_add_and_carry_collection_prefix() {
    let conn = open_db_in_memory().unwrap();
    let repo = trend_repo(&conn);

    let entry = TrendEntry::new(day("2025-01-01"), MetricKind::Sleep, 7.0);
    let first = repo.add(&entry).unwrap();
    let second = repo.add(&entry).unwrap();

    assert_ne!(first, second);
    assert!(first.as_str().starts_with("trend-"));
    assert_eq!(repo.count().unwrap(), 2);
}

#[test]
fn get_missing_id_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = trend_repo(&conn);

    assert!(repo.get(&RecordId::from("trend-0-missing")).unwrap().is_none());
}

#[test]
fn update_changes_only_patched_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRecordRepository<'_, ErVisit> =
        SqliteRecordRepository::try_new(&conn, MissingRecordPolicy::Strict).unwrap();

    let original = er_visit();
    let id = repo.add(&original).unwrap();

    let patch = ErVisitPatch {
        diagnosis: Some("Vasovagal syncope".to_string()),
        ..ErVisitPatch::default()
    };
    repo.update(&id, &patch).unwrap();

    let loaded = repo.get(&id).unwrap().unwrap();
    let expected = ErVisit {
        diagnosis: "Vasovagal syncope".to_string(),
        ..original
    };
    assert_eq!(loaded.record, expected);
    assert_eq!(loaded.id, id);
}

#[test]
fn update_rewrites_secondary_index() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRecordRepository<'_, MedEffectEntry> =
        SqliteRecordRepository::try_new(&conn, MissingRecordPolicy::Strict).unwrap();

    let id = repo.add(&med_effect("2025-01-05", "Midodrine")).unwrap();
    repo.update(
        &id,
        &MedEffectPatch {
            medication: Some("Fludrocortisone".to_string()),
            ..MedEffectPatch::default()
        },
    )
    .unwrap();

    assert!(repo.find_by_index("medication", "Midodrine").unwrap().is_empty());
    let hits = repo.find_by_index("medication", "Fludrocortisone").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, id);
}

#[test]
fn update_can_clear_optional_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRecordRepository<'_, Allergy> =
        SqliteRecordRepository::try_new(&conn, MissingRecordPolicy::Strict).unwrap();

    let id = repo.add(&allergy("Peanut")).unwrap();
    repo.update(
        &id,
        &AllergyPatch {
            date_discovered: Some(None),
            severity: Some(AllergySeverity::Severe),
            ..AllergyPatch::default()
        },
    )
    .unwrap();

    let loaded = repo.get(&id).unwrap().unwrap();
    assert_eq!(loaded.date_discovered, None);
    assert_eq!(loaded.severity, AllergySeverity::Severe);
    assert_eq!(loaded.name, "Peanut");
}

#[test]
fn strict_policy_reports_missing_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRecordRepository<'_, Trigger> =
        SqliteRecordRepository::try_new(&conn, MissingRecordPolicy::Strict).unwrap();
    let missing = RecordId::from("trigger-0-nothing");

    let update_err = repo
        .update(
            &missing,
            &TriggerPatch {
                severity: Some(2),
                ..TriggerPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(update_err, RepoError::NotFound(ref id) if *id == missing));

    let delete_err = repo.delete(&missing).unwrap_err();
    assert!(matches!(delete_err, RepoError::NotFound(_)));
}

#[test]
fn lenient_policy_ignores_missing_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRecordRepository<'_, Trigger> =
        SqliteRecordRepository::try_new(&conn, MissingRecordPolicy::Lenient).unwrap();
    let missing = RecordId::from("trigger-0-nothing");

    repo.update(&missing, &TriggerPatch::default()).unwrap();
    repo.delete(&missing).unwrap();
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn delete_removes_record_and_is_noop_when_lenient_repeat() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRecordRepository<'_, Allergy> =
        SqliteRecordRepository::try_new(&conn, MissingRecordPolicy::Lenient).unwrap();

    let keep = repo.add(&allergy("Latex")).unwrap();
    let drop_id = repo.add(&allergy("Shellfish")).unwrap();

    repo.delete(&drop_id).unwrap();
    repo.delete(&drop_id).unwrap();

    let remaining: Vec<RecordId> = repo
        .list_all()
        .unwrap()
        .into_iter()
        .map(|stored| stored.id)
        .collect();
    assert_eq!(remaining, vec![keep]);
}

#[test]
fn list_all_of_dated_records_is_most_recent_first() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRecordRepository<'_, MedEffectEntry> =
        SqliteRecordRepository::try_new(&conn, MissingRecordPolicy::Strict).unwrap();

    let older = repo.add(&med_effect("2025-01-01", "A")).unwrap();
    let newest = repo.add(&med_effect("2025-03-01", "B")).unwrap();
    let middle = repo.add(&med_effect("2025-02-01", "C")).unwrap();

    let ids: Vec<RecordId> = repo.list_all().unwrap().into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![newest, middle, older]);
}

#[test]
fn list_all_of_undated_records_keeps_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRecordRepository<'_, Trigger> =
        SqliteRecordRepository::try_new(&conn, MissingRecordPolicy::Strict).unwrap();

    let first = repo.add(&trigger("Heat", TriggerCategory::Environmental)).unwrap();
    let second = repo.add(&trigger("Caffeine", TriggerCategory::Food)).unwrap();
    let third = repo.add(&trigger("Crowds", TriggerCategory::Sensory)).unwrap();

    let ids: Vec<RecordId> = repo.list_all().unwrap().into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![first, second, third]);
}

#[test]
fn find_by_index_is_exact_match() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRecordRepository<'_, Trigger> =
        SqliteRecordRepository::try_new(&conn, MissingRecordPolicy::Strict).unwrap();

    repo.add(&trigger("Heat", TriggerCategory::Environmental)).unwrap();
    let dairy = repo.add(&trigger("Dairy", TriggerCategory::Food)).unwrap();

    let food = repo.find_by_index("category", "food").unwrap();
    assert_eq!(food.len(), 1);
    assert_eq!(food[0].id, dairy);
    assert!(repo.find_by_index("category", "FOOD").unwrap().is_empty());
}

#[test]
fn find_by_undeclared_index_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = trend_repo(&conn);

    let err = repo.find_by_index("payload", "x").unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn out_of_range_levels_are_rejected_on_add_and_update() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRecordRepository<'_, MedEffectEntry> =
        SqliteRecordRepository::try_new(&conn, MissingRecordPolicy::Strict).unwrap();

    let mut invalid = med_effect("2025-01-01", "Midodrine");
    invalid.severity = 6;
    let add_err = repo.add(&invalid).unwrap_err();
    assert!(matches!(
        add_err,
        RepoError::Validation(ValidationError::LevelOutOfRange {
            field: "severity",
            value: 6
        })
    ));
    assert_eq!(repo.count().unwrap(), 0);

    let id = repo.add(&med_effect("2025-01-01", "Midodrine")).unwrap();
    let update_err = repo
        .update(
            &id,
            &MedEffectPatch {
                severity: Some(0),
                ..MedEffectPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(update_err, RepoError::Validation(_)));
    assert_eq!(repo.get(&id).unwrap().unwrap().severity, 2);
}

#[test]
fn non_finite_trend_value_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = trend_repo(&conn);

    let err = repo
        .add(&TrendEntry::new(day("2025-01-01"), MetricKind::Hr, f64::NAN))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::NonFiniteValue { field: "value" })
    ));
}

#[test]
fn good_day_levels_and_appointment_satisfaction_are_validated() {
    let conn = open_db_in_memory().unwrap();
    let good_days: SqliteRecordRepository<'_, GoodDay> =
        SqliteRecordRepository::try_new(&conn, MissingRecordPolicy::Strict).unwrap();
    let appointments: SqliteRecordRepository<'_, AppointmentNote> =
        SqliteRecordRepository::try_new(&conn, MissingRecordPolicy::Strict).unwrap();

    let good_day = GoodDay {
        date: day("2025-04-01"),
        title: "Garden".to_string(),
        description: "Planted tomatoes".to_string(),
        photos: Vec::new(),
        quotes: Vec::new(),
        gratitude: Vec::new(),
        energy_level: 4,
        pain_level: 9,
        mood_level: 5,
    };
    assert!(matches!(
        good_days.add(&good_day).unwrap_err(),
        RepoError::Validation(ValidationError::LevelOutOfRange {
            field: "painLevel",
            ..
        })
    ));

    let appointment = AppointmentNote {
        date: day("2025-04-02"),
        doctor: "Dr. Patel".to_string(),
        specialty: "Cardiology".to_string(),
        reason: "Tilt table results".to_string(),
        questions_asked: Vec::new(),
        answers_received: Vec::new(),
        tests_ordered: Vec::new(),
        prescriptions: Vec::new(),
        follow_up_date: None,
        notes: String::new(),
        satisfaction: 0,
    };
    assert!(appointments.add(&appointment).is_err());
}

#[test]
fn vital_alerts_cannot_be_created_resolved() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRecordRepository<'_, VitalAlert> =
        SqliteRecordRepository::try_new(&conn, MissingRecordPolicy::Strict).unwrap();

    let mut alert = VitalAlert::new(
        day("2025-01-01"),
        VitalAlertKind::HrHigh,
        "142",
        "120",
        AlertSeverity::Warning,
    );
    alert.resolved = true;

    let err = repo.add(&alert).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::CreatedResolved)
    ));
}

#[test]
fn doctor_protocol_update_keeps_untouched_lists() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRecordRepository<'_, DoctorProtocol> =
        SqliteRecordRepository::try_new(&conn, MissingRecordPolicy::Strict).unwrap();

    let protocol = DoctorProtocol {
        doctor_name: "Dr. Chen".to_string(),
        specialty: "Neurology".to_string(),
        prep_checklist: vec!["Bring symptom log".to_string()],
        standard_questions: vec!["Is this dysautonomia?".to_string()],
        labs_to_request: vec!["Ferritin".to_string()],
        tips_for_visit: Vec::new(),
        boundaries: vec!["No psych referral without workup".to_string()],
        last_updated: day("2025-01-10"),
    };
    let id = repo.add(&protocol).unwrap();

    repo.update(
        &id,
        &DoctorProtocolPatch {
            labs_to_request: Some(vec!["Ferritin".to_string(), "B12".to_string()]),
            last_updated: Some(day("2025-02-01")),
            ..DoctorProtocolPatch::default()
        },
    )
    .unwrap();

    let loaded = repo.get(&id).unwrap().unwrap();
    assert_eq!(loaded.labs_to_request, vec!["Ferritin", "B12"]);
    assert_eq!(loaded.boundaries, protocol.boundaries);
    assert_eq!(loaded.prep_checklist, protocol.prep_checklist);
    assert_eq!(loaded.last_updated, day("2025-02-01"));
}

#[test]
fn trend_update_moves_record_between_days() {
    let conn = open_db_in_memory().unwrap();
    let repo = trend_repo(&conn);

    let id = repo
        .add(&TrendEntry::new(day("2025-01-01"), MetricKind::Energy, 3.0))
        .unwrap();
    repo.update(
        &id,
        &TrendEntryPatch {
            date: Some(day("2025-01-05")),
            ..TrendEntryPatch::default()
        },
    )
    .unwrap();

    let hits = repo
        .find_by_index_between("kind", "energy", day("2025-01-04"), day("2025-01-06"))
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, id);
}

#[test]
fn records_survive_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("healthlog.db");

    let id = {
        let conn = open_db(&path).unwrap();
        let repo: SqliteRecordRepository<'_, Allergy> =
            SqliteRecordRepository::try_new(&conn, MissingRecordPolicy::Strict).unwrap();
        repo.add(&allergy("Penicillin")).unwrap()
    };

    let conn = open_db(&path).unwrap();
    let repo: SqliteRecordRepository<'_, Allergy> =
        SqliteRecordRepository::try_new(&conn, MissingRecordPolicy::Strict).unwrap();
    let loaded = repo.get(&id).unwrap().unwrap();
    assert_eq!(loaded.record, allergy("Penicillin"));
}

#[test]
fn corrupt_payload_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let repo = trend_repo(&conn);
    let id = repo
        .add(&TrendEntry::new(day("2025-01-01"), MetricKind::Bp, 120.0))
        .unwrap();

    conn.execute(
        "UPDATE trends SET payload = '{\"date\":\"not-a-day\"}' WHERE id = ?1;",
        [id.as_str()],
    )
    .unwrap();

    let err = repo.get(&id).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result: Result<SqliteRecordRepository<'_, TrendEntry>, _> =
        SqliteRecordRepository::try_new(&conn, MissingRecordPolicy::Strict);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_collection_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result: Result<SqliteRecordRepository<'_, TrendEntry>, _> =
        SqliteRecordRepository::try_new(&conn, MissingRecordPolicy::Strict);
    assert!(matches!(result, Err(RepoError::MissingRequiredTable("trends"))));
}
