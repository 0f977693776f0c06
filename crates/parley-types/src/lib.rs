//! Shared types and constants for the Parley demo agents.
//!
//! This crate provides the foundational enums used across all Parley
//! crates: which demo bot a call belongs to, and the review status of a
//! fraud case. No crate in the workspace depends on anything *except*
//! `parley-types` for cross-cutting type definitions, which keeps the
//! dependency graph clean and prevents circular dependencies.

use serde::{Deserialize, Serialize};

/// The two demo agents shipped by this repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotKind {
    /// Tabletop-game narrator ("game master") agent.
    Narrator,
    /// Bank fraud-verification caller agent.
    FraudDesk,
}

impl BotKind {
    /// Returns the canonical slug for this bot, used in room names and
    /// API paths.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Narrator => "narrator",
            Self::FraudDesk => "fraud_desk",
        }
    }

    /// Attempts to parse a slug into a `BotKind`.
    ///
    /// Returns `None` for unknown slugs.
    pub fn from_slug(s: &str) -> Option<Self> {
        match s {
            "narrator" => Some(Self::Narrator),
            "fraud_desk" => Some(Self::FraudDesk),
            _ => None,
        }
    }
}

impl std::fmt::Display for BotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review status of a fraud case.
///
/// A case starts in `PendingReview` and moves to exactly one of the two
/// confirmed states when the customer renders a decision during a
/// verified call. The canonical labels are what the database stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// The flagged transaction awaits customer review.
    PendingReview,
    /// The customer confirmed the transaction as their own.
    ConfirmedSafe,
    /// The customer reported the transaction as fraudulent.
    ConfirmedFraud,
}

impl CaseStatus {
    /// Returns the canonical string label for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PendingReview => "pending_review",
            Self::ConfirmedSafe => "confirmed_safe",
            Self::ConfirmedFraud => "confirmed_fraud",
        }
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CaseStatus {
    type Err = ParseCaseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_review" => Ok(Self::PendingReview),
            "confirmed_safe" => Ok(Self::ConfirmedSafe),
            "confirmed_fraud" => Ok(Self::ConfirmedFraud),
            _ => Err(ParseCaseStatusError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown case status label.
#[derive(Debug, Clone)]
pub struct ParseCaseStatusError(pub String);

impl std::fmt::Display for ParseCaseStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown case status: {}", self.0)
    }
}

impl std::error::Error for ParseCaseStatusError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_kind_round_trip() {
        for bot in [BotKind::Narrator, BotKind::FraudDesk] {
            assert_eq!(BotKind::from_slug(bot.as_str()), Some(bot));
        }
    }

    #[test]
    fn bot_kind_unknown_slug() {
        assert_eq!(BotKind::from_slug("croupier"), None);
        assert_eq!(BotKind::from_slug(""), None);
    }

    #[test]
    fn case_status_round_trip() {
        for status in [
            CaseStatus::PendingReview,
            CaseStatus::ConfirmedSafe,
            CaseStatus::ConfirmedFraud,
        ] {
            let label = status.as_str();
            assert_eq!(label.parse::<CaseStatus>().ok(), Some(status));
        }
    }

    #[test]
    fn case_status_invalid_label() {
        assert!("resolved".parse::<CaseStatus>().is_err());
        assert!("PENDING_REVIEW".parse::<CaseStatus>().is_err());
    }

    #[test]
    fn case_status_serde_uses_canonical_labels() {
        let json = serde_json::to_string(&CaseStatus::ConfirmedFraud).expect("should serialize");
        assert_eq!(json, "\"confirmed_fraud\"");

        let back: CaseStatus =
            serde_json::from_str("\"pending_review\"").expect("should deserialize");
        assert_eq!(back, CaseStatus::PendingReview);
    }
}
