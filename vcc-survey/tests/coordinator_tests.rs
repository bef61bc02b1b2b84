use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::thread;
use vcc_crypto::{EncryptionKey, StaticKeyProvider};
use vcc_ledger::AggregationLedger;
use vcc_storage::{with_transaction, CompanyStore, Database};
use vcc_survey::{retention_horizon, CompanyLocks, SplitCoordinator, SplitSettings, SurveyError};
use vcc_types::{Category, Company, CompanyId, Dimension, SurveySubmission};
use vcc_vault::ComplianceVault;

fn coordinator(db: &Database, settings: SplitSettings) -> SplitCoordinator {
    let keys = Arc::new(StaticKeyProvider::new(EncryptionKey::generate()));
    SplitCoordinator::new(db.clone(), keys, CompanyLocks::new(), settings)
}

fn add_company(db: &Database, token: &str, founders: u32) -> CompanyId {
    let company = Company {
        id: CompanyId::new(),
        name: format!("Company {token}"),
        investment_year: 2024,
        founder_count: founders,
        survey_token: token.to_string(),
        created_at: 0,
    };
    let conn = db.connection().unwrap();
    with_transaction(&conn, |conn| -> Result<(), SurveyError> {
        CompanyStore::insert_in(conn, &company)?;
        AggregationLedger::open_in(conn, &company.id)?;
        Ok(())
    })
    .unwrap();
    company.id
}

fn woman(token: &str) -> SurveySubmission {
    let mut selections = BTreeMap::new();
    selections.insert(Dimension::Gender, BTreeSet::from(["woman".to_string()]));
    SurveySubmission {
        company_token: token.to_string(),
        selections,
        decline_all: false,
    }
}

fn records(db: &Database, company: &CompanyId) -> usize {
    let vault = ComplianceVault::new(db.clone(), Arc::new(StaticKeyProvider::unavailable()));
    vault.record_metadata(company).unwrap().len()
}

#[test]
fn failed_record_append_rolls_back_the_increment() {
    let db = Database::open_in_memory().unwrap();
    let company = add_company(&db, "tok", 2);
    let split = coordinator(&db, SplitSettings::default());

    split.submit(woman("tok"), "x").unwrap();

    db.connection()
        .unwrap()
        .execute_batch("DROP TABLE individual_records")
        .unwrap();

    let err = split.submit(woman("tok"), "x").unwrap_err();
    assert!(matches!(err, SurveyError::Storage(_)));

    let agg = AggregationLedger::new(db.clone()).read(&company).unwrap();
    assert_eq!(agg.total_responses, 1);
    assert_eq!(agg.count(Category::GenderWoman), 1);
}

#[test]
fn missing_aggregate_leaves_no_orphan_record() {
    let db = Database::open_in_memory().unwrap();
    let company = add_company(&db, "tok", 2);
    db.connection()
        .unwrap()
        .execute(
            "DELETE FROM aggregates WHERE company_id = ?",
            duckdb::params![company.to_string()],
        )
        .unwrap();

    let err = coordinator(&db, SplitSettings::default())
        .submit(woman("tok"), "x")
        .unwrap_err();
    assert!(matches!(err, SurveyError::NotFound(_)));
    assert_eq!(records(&db, &company), 0);
}

#[test]
fn concurrent_submissions_to_one_company_are_all_counted() {
    const FOUNDERS: u32 = 24;
    let db = Database::open_in_memory().unwrap();
    let company = add_company(&db, "tok", FOUNDERS);
    let split = Arc::new(coordinator(&db, SplitSettings::default()));

    let handles: Vec<_> = (0..FOUNDERS)
        .map(|i| {
            let split = Arc::clone(&split);
            thread::spawn(move || split.submit(woman("tok"), &format!("10.0.0.{i}")))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    let agg = AggregationLedger::new(db.clone()).read(&company).unwrap();
    assert_eq!(agg.total_responses, u64::from(FOUNDERS));
    assert_eq!(agg.count(Category::GenderWoman), u64::from(FOUNDERS));
    assert_eq!(agg.diverse_responders, u64::from(FOUNDERS));
    assert!(agg.is_primarily_diverse);
    assert_eq!(records(&db, &company), FOUNDERS as usize);
}

#[test]
fn concurrent_submissions_across_companies_stay_separate() {
    let db = Database::open_in_memory().unwrap();
    let tokens = ["a", "b", "c", "d"];
    let ids: Vec<CompanyId> = tokens.iter().map(|t| add_company(&db, t, 10)).collect();
    let split = Arc::new(coordinator(
        &db,
        SplitSettings {
            max_conflict_retries: 50,
            ..SplitSettings::default()
        },
    ));

    let handles: Vec<_> = tokens
        .iter()
        .flat_map(|t| std::iter::repeat_n(*t, 5))
        .map(|token| {
            let split = Arc::clone(&split);
            thread::spawn(move || split.submit(woman(token), "x"))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    let ledger = AggregationLedger::new(db.clone());
    for id in &ids {
        assert_eq!(ledger.read(id).unwrap().total_responses, 5);
        assert_eq!(records(&db, id), 5);
    }
}

#[test]
fn retention_horizon_adds_calendar_years() {
    let leap_day = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
    let expected = Utc.with_ymd_and_hms(2028, 2, 29, 12, 0, 0).unwrap();
    assert_eq!(
        retention_horizon(leap_day.timestamp_millis(), 4).unwrap(),
        expected.timestamp_millis()
    );

    let plain = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
    let next = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    assert_eq!(
        retention_horizon(plain.timestamp_millis(), 1).unwrap(),
        next.timestamp_millis()
    );
}

#[test]
fn lock_registry_hands_out_one_mutex_per_company() {
    let locks = CompanyLocks::new();
    let a = CompanyId::new();
    let b = CompanyId::new();

    assert!(locks.is_empty());
    assert!(Arc::ptr_eq(&locks.lock_for(&a), &locks.lock_for(&a)));
    assert!(!Arc::ptr_eq(&locks.lock_for(&a), &locks.lock_for(&b)));
    assert_eq!(locks.len(), 2);

    let shared = locks.clone();
    assert!(Arc::ptr_eq(&locks.lock_for(&b), &shared.lock_for(&b)));
}
