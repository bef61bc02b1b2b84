use pretty_assertions::assert_eq;
use vcc_storage::{with_transaction, CompanyStore, Database, StorageError};
use vcc_types::{Company, CompanyId};

fn company(name: &str, year: i32, token: &str) -> Company {
    Company {
        id: CompanyId::new(),
        name: name.into(),
        investment_year: year,
        founder_count: 3,
        survey_token: token.into(),
        created_at: 1_700_000_000_000,
    }
}

fn insert(db: &Database, company: &Company) {
    let conn = db.connection().unwrap();
    with_transaction(&conn, |conn| CompanyStore::insert_in(conn, company)).unwrap();
}

// ── Basic CRUD ───────────────────────────────────────────────────

#[test]
fn insert_and_get() {
    let db = Database::open_in_memory().unwrap();
    let store = CompanyStore::new(db.clone());
    let acme = company("Acme", 2024, "tok-acme");
    insert(&db, &acme);

    assert_eq!(store.get(&acme.id).unwrap(), Some(acme.clone()));
    assert_eq!(store.get_by_token("tok-acme").unwrap(), Some(acme));
}

#[test]
fn unknown_token_is_none() {
    let db = Database::open_in_memory().unwrap();
    let store = CompanyStore::new(db);
    assert!(store.get_by_token("missing").unwrap().is_none());
    assert!(store.get(&CompanyId::new()).unwrap().is_none());
}

#[test]
fn duplicate_token_is_rejected() {
    let db = Database::open_in_memory().unwrap();
    insert(&db, &company("A", 2024, "same"));

    let conn = db.connection().unwrap();
    let result = with_transaction(&conn, |conn| {
        CompanyStore::insert_in(conn, &company("B", 2024, "same"))
    });
    assert!(result.is_err());
}

#[test]
fn founder_count_correction() {
    let db = Database::open_in_memory().unwrap();
    let store = CompanyStore::new(db.clone());
    let acme = company("Acme", 2024, "tok");
    insert(&db, &acme);

    let conn = db.connection().unwrap();
    let updated = with_transaction(&conn, |conn| {
        CompanyStore::set_founder_count_in(conn, &acme.id, 7)
    })
    .unwrap();
    assert!(updated);
    assert_eq!(store.get(&acme.id).unwrap().unwrap().founder_count, 7);

    let missing = with_transaction(&conn, |conn| {
        CompanyStore::set_founder_count_in(conn, &CompanyId::new(), 7)
    })
    .unwrap();
    assert!(!missing);
}

// ── Listing ──────────────────────────────────────────────────────

#[test]
fn list_orders_by_year_desc_then_name() {
    let db = Database::open_in_memory().unwrap();
    let store = CompanyStore::new(db.clone());
    insert(&db, &company("Zeta", 2023, "t1"));
    insert(&db, &company("Beta", 2024, "t2"));
    insert(&db, &company("Alpha", 2024, "t3"));

    let names: Vec<_> = store.list().unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Alpha", "Beta", "Zeta"]);
}

#[test]
fn list_by_year_filters() {
    let db = Database::open_in_memory().unwrap();
    let store = CompanyStore::new(db.clone());
    insert(&db, &company("Old", 2021, "t1"));
    insert(&db, &company("New", 2025, "t2"));

    let names: Vec<_> = store
        .list_by_year(2025)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["New"]);
    assert!(store.list_by_year(1999).unwrap().is_empty());
}

// ── Transactions ─────────────────────────────────────────────────

#[test]
fn failed_transaction_leaves_no_trace() {
    let db = Database::open_in_memory().unwrap();
    let store = CompanyStore::new(db.clone());
    let acme = company("Acme", 2024, "tok");

    let conn = db.connection().unwrap();
    let result: Result<(), StorageError> = with_transaction(&conn, |conn| {
        CompanyStore::insert_in(conn, &acme)?;
        conn.execute_batch("SELECT * FROM no_such_table")?;
        Ok(())
    });
    assert!(result.is_err());
    assert!(store.get(&acme.id).unwrap().is_none());
}

#[test]
fn connection_can_be_reused_after_rollback() {
    let db = Database::open_in_memory().unwrap();
    let acme = company("Acme", 2024, "tok");
    let conn = db.connection().unwrap();

    let _ = with_transaction(&conn, |conn| -> Result<(), StorageError> {
        conn.execute_batch("SELECT * FROM no_such_table")?;
        Ok(())
    });
    with_transaction(&conn, |conn| CompanyStore::insert_in(conn, &acme)).unwrap();
    assert!(CompanyStore::new(db).get(&acme.id).unwrap().is_some());
}

#[test]
fn cloned_connections_share_data() {
    let db = Database::open_in_memory().unwrap();
    let acme = company("Acme", 2024, "tok");
    insert(&db, &acme);

    let other = db.connection().unwrap();
    assert!(CompanyStore::get_in(&other, &acme.id).unwrap().is_some());
}

// ── File-backed ──────────────────────────────────────────────────

#[test]
fn file_database_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("survey.duckdb");
    let acme = company("Acme", 2024, "tok");

    {
        let db = Database::open(&path, "64MB", 1).unwrap();
        insert(&db, &acme);
    }

    let db = Database::open(&path, "64MB", 1).unwrap();
    let store = CompanyStore::new(db);
    assert_eq!(store.get(&acme.id).unwrap(), Some(acme));
}

#[test]
fn memory_path_opens_in_memory() {
    let db = Database::open(std::path::Path::new(":memory:"), "64MB", 1).unwrap();
    assert!(CompanyStore::new(db).list().unwrap().is_empty());
}
