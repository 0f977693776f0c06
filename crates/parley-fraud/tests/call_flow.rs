//! End-to-end verification call against the real SQLite store.

use std::sync::Arc;

use parley_db::{create_pool, run_migrations, DbRuntimeSettings};
use parley_fraud::{load_directory, CaseStore, Disposition, FraudCall, SqliteCaseStore, Stage};
use parley_types::CaseStatus;

fn open_store(dir: &tempfile::TempDir) -> SqliteCaseStore {
    let db_path = dir.path().join("parley.db");
    let pool = create_pool(
        db_path.to_str().expect("temp path should be utf-8"),
        DbRuntimeSettings::default(),
    )
    .expect("pool creation should succeed");

    {
        let conn = pool.get().expect("should get a connection");
        run_migrations(&conn).expect("migrations should succeed");
    }

    SqliteCaseStore::new(pool)
}

#[test]
fn full_call_round_trips_through_the_store() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let store = Arc::new(open_store(&dir));
    let directory = load_directory(store.as_ref());
    assert_eq!(directory.len(), 3, "seed migration should load");

    let mut call = FraudCall::new(directory, store.clone());

    let opening = call.opening_line();
    assert_eq!(opening.stage, Stage::UsernameCollection);

    // Misspelled name re-prompts without binding.
    let miss = call.lookup_case("Jain Doe");
    assert_eq!(miss.disposition, Disposition::Reprompt);

    let bound = call.lookup_case("jane doe");
    assert_eq!(bound.stage, Stage::Verification1);

    assert_eq!(call.verify_step("4471").stage, Stage::Verification2);
    assert_eq!(call.verify_step("BLUE").stage, Stage::TransactionReview);

    let decided = call.record_decision("that was not me");
    assert_eq!(decided.disposition, Disposition::Advanced);
    assert_eq!(decided.stage, Stage::Closing);

    let closing = call.end_call();
    assert!(closing.message.to_lowercase().contains("blocked"));

    // Reload the store: the decision must have survived, with non-empty
    // outcome metadata, and only the matched record touched.
    let reloaded = store.load_all().expect("reload should succeed");
    let jane = reloaded
        .iter()
        .find(|c| c.customer_name == "Jane Doe")
        .expect("seeded case should still exist");
    assert_eq!(jane.status, CaseStatus::ConfirmedFraud);
    assert!(jane.resolved_at.as_deref().is_some_and(|t| !t.is_empty()));
    assert!(jane.outcome_note.as_deref().is_some_and(|n| !n.is_empty()));

    for other in reloaded.iter().filter(|c| c.customer_name != "Jane Doe") {
        assert_eq!(other.status, CaseStatus::PendingReview);
        assert!(other.resolved_at.is_none());
    }
}

#[test]
fn failed_verification_never_writes_to_the_store() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let store = Arc::new(open_store(&dir));
    let directory = load_directory(store.as_ref());

    let mut call = FraudCall::new(directory, store.clone());
    call.lookup_case("Priya Sharma");

    let refused = call.verify_step("0000");
    assert_eq!(refused.disposition, Disposition::Refused);
    assert_eq!(refused.stage, Stage::Closing);

    // Even a direct decision attempt afterwards cannot touch the store.
    let blocked = call.record_decision("fraud");
    assert_eq!(blocked.disposition, Disposition::Unchanged);

    let reloaded = store.load_all().expect("reload should succeed");
    assert!(reloaded
        .iter()
        .all(|c| c.status == CaseStatus::PendingReview));
}

#[test]
fn audit_row_is_written_with_the_outcome() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let db_path = dir.path().join("parley.db");
    let pool = create_pool(
        db_path.to_str().expect("temp path should be utf-8"),
        DbRuntimeSettings::default(),
    )
    .expect("pool creation should succeed");
    {
        let conn = pool.get().expect("should get a connection");
        run_migrations(&conn).expect("migrations should succeed");
    }
    let store = Arc::new(SqliteCaseStore::new(pool.clone()));
    let directory = load_directory(store.as_ref());

    let mut call = FraudCall::new(directory, store);
    call.lookup_case("Marcus Webb");
    call.verify_step("8302");
    call.verify_step("Biscuit");
    call.record_decision("yes");

    let conn = pool.get().expect("should get a connection");
    let (name, status, note): (String, String, String) = conn
        .query_row(
            "SELECT customer_name, status, note FROM fraud_results",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .expect("exactly one audit row should exist");
    assert_eq!(name, "Marcus Webb");
    assert_eq!(status, "confirmed_safe");
    assert!(!note.is_empty());
}
