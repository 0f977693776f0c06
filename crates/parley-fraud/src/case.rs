//! Fraud case records.

use parley_types::CaseStatus;
use serde::{Deserialize, Serialize};

/// The flagged transaction attached to a fraud case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDetails {
    /// Merchant name as it appears on the statement.
    pub merchant: String,
    /// When the transaction occurred.
    pub time: String,
    /// Spending category (electronics, travel, ...).
    pub category: String,
    /// How the charge was made (online, phone order, ...).
    pub source: String,
    /// Charge amount in dollars.
    pub amount: f64,
    /// Where the charge originated.
    pub location: String,
    /// Last four digits of the card used.
    pub card_last4: String,
}

/// One fraud case: a customer, their identity-check secrets, and the
/// flagged transaction under review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Customer name; looked up by case-insensitive exact match.
    pub customer_name: String,
    /// Shared secret compared for exact equality in the first
    /// verification step.
    pub security_id: String,
    /// First security question, asked after the identifier check passes.
    pub question1: String,
    /// Expected answer to the first question (compared case-insensitively).
    pub answer1: String,
    /// Fallback security question; loaded but not reached by the demo
    /// call script.
    pub question2: String,
    /// Expected answer to the fallback question.
    pub answer2: String,
    /// The transaction under review.
    pub transaction: TransactionDetails,
    /// Current review status.
    pub status: CaseStatus,
    /// RFC 3339 timestamp set when the case is resolved.
    pub resolved_at: Option<String>,
    /// Free-text audit note set when the case is resolved.
    pub outcome_note: Option<String>,
}

impl CaseRecord {
    /// Whether `name` matches this record's customer, ignoring case and
    /// surrounding whitespace. The match is exact, not fuzzy.
    pub fn matches_name(&self, name: &str) -> bool {
        name.trim().to_lowercase() == self.customer_name.trim().to_lowercase()
    }

    /// The identity key used for store updates. Both fields must match so
    /// an update can never touch a different record with a colliding name.
    pub fn key(&self) -> CaseKey {
        CaseKey {
            customer_name: self.customer_name.clone(),
            security_id: self.security_id.clone(),
        }
    }
}

/// Identity key for a case: customer name plus security identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseKey {
    pub customer_name: String,
    pub security_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CaseRecord {
        CaseRecord {
            customer_name: "Jane Doe".to_string(),
            security_id: "4471".to_string(),
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
    fn name_match_ignores_case_and_whitespace() {
        let case = record();
        assert!(case.matches_name("jane doe"));
        assert!(case.matches_name("  JANE DOE  "));
        assert!(case.matches_name("Jane Doe"));
    }

    #[test]
    fn name_match_is_exact_not_fuzzy() {
        let case = record();
        assert!(!case.matches_name("Jane"));
        assert!(!case.matches_name("Jane Doering"));
        assert!(!case.matches_name(""));
    }

    #[test]
    fn key_carries_both_identity_fields() {
        let key = record().key();
        assert_eq!(key.customer_name, "Jane Doe");
        assert_eq!(key.security_id, "4471");
    }
}
