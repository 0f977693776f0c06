//! Call stages and the transitions between them.

use serde::{Deserialize, Serialize};

/// Position of a verification call within its conversation script.
///
/// The stage machine is strictly forward-moving: a call can skip ahead
/// (a failed check jumps straight to `Closing`) but can never return to
/// an earlier stage. `Closing` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Opening line has not been delivered yet.
    Greeting,
    /// Waiting for the caller to state their name.
    UsernameCollection,
    /// Case bound; waiting for the security identifier.
    Verification1,
    /// Identifier accepted; waiting for the security answer.
    Verification2,
    /// Identity verified; transaction disclosed, awaiting yes/no.
    TransactionReview,
    /// A decision prompt is pending a clear answer.
    Decision,
    /// Call is winding down. No further transitions.
    Closing,
}

impl Stage {
    /// Returns the canonical label for this stage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::UsernameCollection => "username_collection",
            Self::Verification1 => "verification1",
            Self::Verification2 => "verification2",
            Self::TransactionReview => "transaction_review",
            Self::Decision => "decision",
            Self::Closing => "closing",
        }
    }

    /// Whether the call can go nowhere else from this stage.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closing)
    }

    /// The explicit transition table.
    ///
    /// A failed verification may jump from either check stage to
    /// `Closing`; everything else moves one step along the script.
    pub fn can_transition_to(self, next: Stage) -> bool {
        use Stage::*;
        matches!(
            (self, next),
            (Greeting, UsernameCollection)
                | (Greeting, Verification1)
                | (UsernameCollection, Verification1)
                | (Verification1, Verification2)
                | (Verification1, Closing)
                | (Verification2, TransactionReview)
                | (Verification2, Closing)
                | (TransactionReview, Decision)
                | (TransactionReview, Closing)
                | (Decision, Closing)
        )
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Stage; 7] = [
        Stage::Greeting,
        Stage::UsernameCollection,
        Stage::Verification1,
        Stage::Verification2,
        Stage::TransactionReview,
        Stage::Decision,
        Stage::Closing,
    ];

    #[test]
    fn closing_is_terminal() {
        assert!(Stage::Closing.is_terminal());
        for next in ALL {
            assert!(
                !Stage::Closing.can_transition_to(next),
                "closing must not transition to {next}"
            );
        }
    }

    #[test]
    fn no_backward_transitions() {
        // Index order matches script order; a transition to a strictly
        // earlier index must never be legal.
        for (i, from) in ALL.iter().enumerate() {
            for to in &ALL[..i] {
                assert!(
                    !from.can_transition_to(*to),
                    "{from} must not transition back to {to}"
                );
            }
        }
    }

    #[test]
    fn verification_failures_jump_to_closing() {
        assert!(Stage::Verification1.can_transition_to(Stage::Closing));
        assert!(Stage::Verification2.can_transition_to(Stage::Closing));
    }

    #[test]
    fn script_order_transitions_are_legal() {
        assert!(Stage::Greeting.can_transition_to(Stage::UsernameCollection));
        assert!(Stage::UsernameCollection.can_transition_to(Stage::Verification1));
        assert!(Stage::Verification1.can_transition_to(Stage::Verification2));
        assert!(Stage::Verification2.can_transition_to(Stage::TransactionReview));
        assert!(Stage::TransactionReview.can_transition_to(Stage::Decision));
        assert!(Stage::Decision.can_transition_to(Stage::Closing));
    }

    #[test]
    fn verification_stages_cannot_be_skipped() {
        assert!(!Stage::Greeting.can_transition_to(Stage::Verification2));
        assert!(!Stage::UsernameCollection.can_transition_to(Stage::TransactionReview));
        assert!(!Stage::Verification1.can_transition_to(Stage::TransactionReview));
    }
}
