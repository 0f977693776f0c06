//! Case store abstraction and implementations.
//!
//! The workflow never touches the database directly: it is handed a
//! [`CaseStore`] at call creation, so tests can inject
//! [`MemoryCaseStore`] instead of a file-backed database. The production
//! implementation is [`SqliteCaseStore`], which updates exactly one
//! record keyed by (customer name, security identifier) and appends a
//! matching audit row to `fraud_results` in the same transaction.

use std::sync::{Arc, Mutex};

use parley_db::DbPool;
use parley_types::CaseStatus;
use rusqlite::{params, Connection, Row};
use thiserror::Error;

use crate::case::{CaseKey, CaseRecord, TransactionDetails};

/// Errors that can occur during case store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database operation failed.
    #[error("case store database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Could not obtain a pooled connection.
    #[error("case store pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// No record matched the given identity key.
    #[error("no case found for customer '{0}'")]
    CaseNotFound(String),
}

/// Persistence boundary for fraud cases.
///
/// `load_all` runs once at process start; `record_outcome` runs at most
/// once per case, when the customer renders a decision.
pub trait CaseStore: Send + Sync {
    /// Loads every case in the store.
    fn load_all(&self) -> Result<Vec<CaseRecord>, StoreError>;

    /// Records a resolution for the single record matching `key`.
    ///
    /// Both key fields must match; a colliding customer name with a
    /// different security identifier is a different record and must be
    /// left untouched.
    fn record_outcome(
        &self,
        key: &CaseKey,
        status: CaseStatus,
        note: &str,
        resolved_at: &str,
    ) -> Result<(), StoreError>;
}

/// Loads the case directory at startup.
///
/// A store read failure yields an empty directory (every lookup will then
/// miss) rather than aborting startup; the failure is logged.
pub fn load_directory(store: &dyn CaseStore) -> Arc<Vec<CaseRecord>> {
    match store.load_all() {
        Ok(cases) => {
            tracing::info!(count = cases.len(), "loaded fraud case directory");
            Arc::new(cases)
        }
        Err(e) => {
            tracing::warn!("failed to load fraud case directory, starting empty: {e}");
            Arc::new(Vec::new())
        }
    }
}

// ── SQLite implementation ────────────────────────────────────────────

/// Loads every case from the `fraud_cases` table.
pub fn load_cases(conn: &Connection) -> Result<Vec<CaseRecord>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT
            customer_name, security_id,
            question1, answer1, question2, answer2,
            merchant, tx_time, category, source, amount, location, card_last4,
            status, resolved_at, outcome_note
        FROM fraud_cases
        ORDER BY customer_name ASC",
    )?;

    let rows = stmt.query_map([], map_row_to_case)?;
    let mut cases = Vec::new();
    for row in rows {
        cases.push(row?);
    }
    Ok(cases)
}

/// Resolves the single case matching `key` and appends the audit row.
///
/// Both statements run in one transaction so the case update and its
/// `fraud_results` entry cannot diverge.
pub fn record_case_outcome(
    conn: &Connection,
    key: &CaseKey,
    status: CaseStatus,
    note: &str,
    resolved_at: &str,
) -> Result<(), StoreError> {
    let tx = conn.unchecked_transaction()?;

    let count = tx.execute(
        "UPDATE fraud_cases
         SET status = ?1, resolved_at = ?2, outcome_note = ?3
         WHERE customer_name = ?4 AND security_id = ?5",
        params![
            status.as_str(),
            resolved_at,
            note,
            key.customer_name,
            key.security_id,
        ],
    )?;
    if count == 0 {
        return Err(StoreError::CaseNotFound(key.customer_name.clone()));
    }

    tx.execute(
        "INSERT INTO fraud_results (customer_name, security_id, status, note, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            key.customer_name,
            key.security_id,
            status.as_str(),
            note,
            resolved_at,
        ],
    )?;

    tx.commit()?;
    Ok(())
}

fn map_row_to_case(row: &Row) -> rusqlite::Result<CaseRecord> {
    let status_str: String = row.get(13)?;
    let status: CaseStatus = status_str.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(13, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(CaseRecord {
        customer_name: row.get(0)?,
        security_id: row.get(1)?,
        question1: row.get(2)?,
        answer1: row.get(3)?,
        question2: row.get(4)?,
        answer2: row.get(5)?,
        transaction: TransactionDetails {
            merchant: row.get(6)?,
            time: row.get(7)?,
            category: row.get(8)?,
            source: row.get(9)?,
            amount: row.get(10)?,
            location: row.get(11)?,
            card_last4: row.get(12)?,
        },
        status,
        resolved_at: row.get(14)?,
        outcome_note: row.get(15)?,
    })
}

/// Pooled SQLite case store.
#[derive(Clone)]
pub struct SqliteCaseStore {
    pool: DbPool,
}

impl SqliteCaseStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CaseStore for SqliteCaseStore {
    fn load_all(&self) -> Result<Vec<CaseRecord>, StoreError> {
        let conn = self.pool.get()?;
        load_cases(&conn)
    }

    fn record_outcome(
        &self,
        key: &CaseKey,
        status: CaseStatus,
        note: &str,
        resolved_at: &str,
    ) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        record_case_outcome(&conn, key, status, note, resolved_at)
    }
}

// ── In-memory implementation ─────────────────────────────────────────

/// In-memory case store for tests and for running without a database.
#[derive(Debug, Default)]
pub struct MemoryCaseStore {
    cases: Mutex<Vec<CaseRecord>>,
}

impl MemoryCaseStore {
    pub fn new(cases: Vec<CaseRecord>) -> Self {
        Self {
            cases: Mutex::new(cases),
        }
    }

    /// Snapshot of the current store contents.
    pub fn snapshot(&self) -> Vec<CaseRecord> {
        self.cases.lock().expect("case store lock poisoned").clone()
    }
}

impl CaseStore for MemoryCaseStore {
    fn load_all(&self) -> Result<Vec<CaseRecord>, StoreError> {
        Ok(self.snapshot())
    }

    fn record_outcome(
        &self,
        key: &CaseKey,
        status: CaseStatus,
        note: &str,
        resolved_at: &str,
    ) -> Result<(), StoreError> {
        let mut cases = self.cases.lock().expect("case store lock poisoned");
        let case = cases
            .iter_mut()
            .find(|c| c.customer_name == key.customer_name && c.security_id == key.security_id)
            .ok_or_else(|| StoreError::CaseNotFound(key.customer_name.clone()))?;

        case.status = status;
        case.resolved_at = Some(resolved_at.to_string());
        case.outcome_note = Some(note.to_string());
        Ok(())
    }
}

/// A store that fails every operation; used to exercise degraded paths.
#[cfg(test)]
pub(crate) struct FailingCaseStore;

#[cfg(test)]
impl CaseStore for FailingCaseStore {
    fn load_all(&self) -> Result<Vec<CaseRecord>, StoreError> {
        Err(StoreError::Database(rusqlite::Error::InvalidQuery))
    }

    fn record_outcome(
        &self,
        _key: &CaseKey,
        _status: CaseStatus,
        _note: &str,
        _resolved_at: &str,
    ) -> Result<(), StoreError> {
        Err(StoreError::Database(rusqlite::Error::InvalidQuery))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_case(name: &str, security_id: &str) -> CaseRecord {
        CaseRecord {
            customer_name: name.to_string(),
            security_id: security_id.to_string(),
            question1: "What is your favorite color?".to_string(),
            answer1: "blue".to_string(),
            question2: "What city were you born in?".to_string(),
            answer2: "portland".to_string(),
            transaction: TransactionDetails {
                merchant: "Lumen Electronics".to_string(),
                time: "2025-11-03 02:14".to_string(),
                category: "Electronics".to_string(),
                source: "Online — card not present".to_string(),
                amount: 742.19,
                location: "Austin, TX".to_string(),
                card_last4: "4821".to_string(),
            },
            status: CaseStatus::PendingReview,
            resolved_at: None,
            outcome_note: None,
        }
    }

    #[test]
    fn memory_store_updates_only_the_keyed_record() {
        // Two records with the same name but different identifiers: the
        // update must touch exactly the keyed one.
        let store = MemoryCaseStore::new(vec![
            sample_case("Jane Doe", "4471"),
            sample_case("Jane Doe", "9999"),
        ]);

        store
            .record_outcome(
                &CaseKey {
                    customer_name: "Jane Doe".to_string(),
                    security_id: "4471".to_string(),
                },
                CaseStatus::ConfirmedFraud,
                "Customer reported the transaction as fraud.",
                "2025-11-04T10:00:00Z",
            )
            .expect("outcome should be recorded");

        let cases = store.snapshot();
        assert_eq!(cases[0].status, CaseStatus::ConfirmedFraud);
        assert_eq!(
            cases[0].outcome_note.as_deref(),
            Some("Customer reported the transaction as fraud.")
        );
        assert_eq!(cases[1].status, CaseStatus::PendingReview);
        assert!(cases[1].outcome_note.is_none());
    }

    #[test]
    fn memory_store_missing_key_is_an_error() {
        let store = MemoryCaseStore::new(vec![sample_case("Jane Doe", "4471")]);
        let err = store
            .record_outcome(
                &CaseKey {
                    customer_name: "Jane Doe".to_string(),
                    security_id: "0000".to_string(),
                },
                CaseStatus::ConfirmedSafe,
                "note",
                "2025-11-04T10:00:00Z",
            )
            .expect_err("mismatched security id must not match");
        assert!(matches!(err, StoreError::CaseNotFound(_)));
    }

    #[test]
    fn load_directory_survives_a_broken_store() {
        let directory = load_directory(&FailingCaseStore);
        assert!(directory.is_empty());
    }
}
