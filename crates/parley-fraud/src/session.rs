//! Per-call session state and the verification workflow operations.

use std::sync::Arc;

use parley_types::CaseStatus;
use serde::Serialize;

use crate::case::CaseRecord;
use crate::stage::Stage;
use crate::store::CaseStore;

/// Decision synonyms accepted from the customer. The sets are fixed and
/// literal; matching accepts an exact token or a multi-character leading
/// phrase (so "nope" reads as negative while "maybe" stays unrecognized).
const AFFIRMATIVE_SYNONYMS: &[&str] = &["yes", "y", "correct", "i made it", "that was me"];
const NEGATIVE_SYNONYMS: &[&str] = &[
    "no",
    "n",
    "incorrect",
    "i did not make it",
    "that was not me",
    "fraud",
];

const REFUSAL_MESSAGE: &str = "I'm sorry, but that doesn't match the information we have on \
     file, and for your security I'm not able to continue with verification on this call. \
     Please contact the number on the back of your card. Thank you, and goodbye.";

const GENERIC_PROMPT: &str =
    "Please provide the requested information so we can continue with the verification.";

/// How a workflow operation affected the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// The call moved forward along the script.
    Advanced,
    /// The input could not be used; the caller is asked again.
    Reprompt,
    /// A verification check failed; the call is terminally closed.
    Refused,
    /// Precondition not met or input out of order; nothing changed.
    Unchanged,
    /// The call was ended.
    Closed,
}

/// Structured result of one workflow operation.
///
/// The `message` is the only thing the conversational boundary forwards;
/// `stage` and `disposition` exist so behavior can be tested without
/// asserting on phrasing.
#[derive(Debug, Clone, Serialize)]
pub struct StepReply {
    pub stage: Stage,
    pub disposition: Disposition,
    pub message: String,
}

impl StepReply {
    fn new(stage: Stage, disposition: Disposition, message: impl Into<String>) -> Self {
        Self {
            stage,
            disposition,
            message: message.into(),
        }
    }
}

/// Classification of a customer's decision utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecisionInput {
    Affirmative,
    Negative,
    Unrecognized,
}

/// Classifies a decision utterance against the literal synonym sets.
///
/// Negatives are checked first: an utterance that somehow matched both
/// sets must block the card, not clear it.
fn classify_decision(raw: &str) -> DecisionInput {
    let input = raw.trim().to_lowercase();
    let matches = |synonyms: &[&str]| {
        synonyms
            .iter()
            .any(|s| input == *s || (s.len() > 1 && input.starts_with(s)))
    };

    if matches(NEGATIVE_SYNONYMS) {
        DecisionInput::Negative
    } else if matches(AFFIRMATIVE_SYNONYMS) {
        DecisionInput::Affirmative
    } else {
        DecisionInput::Unrecognized
    }
}

/// Mutable state owned by exactly one call.
///
/// Created at call start and discarded at call end; never shared across
/// calls. The verification flags are only ever set to true, each at most
/// once, and `verification2_passed` cannot become true before
/// `verification1_passed`.
#[derive(Debug, Clone)]
pub struct CallSession {
    case: Option<CaseRecord>,
    stage: Stage,
    verification1_passed: bool,
    verification2_passed: bool,
    ended: bool,
}

impl CallSession {
    fn new() -> Self {
        Self {
            case: None,
            stage: Stage::Greeting,
            verification1_passed: false,
            verification2_passed: false,
            ended: false,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn case(&self) -> Option<&CaseRecord> {
        self.case.as_ref()
    }

    pub fn verification1_passed(&self) -> bool {
        self.verification1_passed
    }

    pub fn verification2_passed(&self) -> bool {
        self.verification2_passed
    }

    pub fn ended(&self) -> bool {
        self.ended
    }

    /// Whether both identity checks passed on this call.
    pub fn fully_verified(&self) -> bool {
        self.verification1_passed && self.verification2_passed
    }

    /// Moves to `next` if the transition table allows it. Illegal
    /// transitions are rejected and logged rather than applied.
    fn advance(&mut self, next: Stage) {
        if self.stage.can_transition_to(next) {
            tracing::debug!(from = %self.stage, to = %next, "call stage transition");
            self.stage = next;
        } else {
            tracing::warn!(
                from = %self.stage,
                to = %next,
                "rejected illegal stage transition"
            );
        }
    }
}

/// One fraud-verification call.
///
/// Holds the process-wide case directory (read-only), the persistence
/// store, and the session state owned by this call. All operations are
/// synchronous; each returns a [`StepReply`] whose message is handed back
/// to the conversation.
pub struct FraudCall {
    directory: Arc<Vec<CaseRecord>>,
    store: Arc<dyn CaseStore>,
    session: CallSession,
}

impl FraudCall {
    pub fn new(directory: Arc<Vec<CaseRecord>>, store: Arc<dyn CaseStore>) -> Self {
        Self {
            directory,
            store,
            session: CallSession::new(),
        }
    }

    pub fn session(&self) -> &CallSession {
        &self.session
    }

    /// The scripted opening line, delivered once when the call connects.
    ///
    /// Delivering it moves the call from `Greeting` to
    /// `UsernameCollection`; repeated invocations re-issue the line
    /// without moving anything.
    pub fn opening_line(&mut self) -> StepReply {
        if self.session.stage == Stage::Greeting {
            self.session.advance(Stage::UsernameCollection);
        }
        StepReply::new(
            self.session.stage,
            Disposition::Advanced,
            "Hello, this is the card security desk calling about a charge we flagged on your \
             account. To pull up the alert, could you please tell me your full name as it \
             appears on the account?",
        )
    }

    /// Looks up a case by customer name (case-insensitive exact match).
    ///
    /// On a match the record is bound to this session and the call moves
    /// to the first verification step. On a miss nothing changes and the
    /// caller is asked to re-confirm the spelling.
    pub fn lookup_case(&mut self, name: &str) -> StepReply {
        if self.session.case.is_some() {
            return StepReply::new(self.session.stage, Disposition::Unchanged, GENERIC_PROMPT);
        }

        match self.directory.iter().find(|c| c.matches_name(name)) {
            Some(record) => {
                tracing::info!(customer = %record.customer_name, "case bound to call");
                self.session.case = Some(record.clone());
                self.session.advance(Stage::Verification1);
                StepReply::new(
                    self.session.stage,
                    Disposition::Advanced,
                    "Thank you. I have the alert in front of me. Before we go any further I \
                     need to verify your identity. Could you please read me the security \
                     identifier for your account?",
                )
            }
            None => {
                tracing::info!(name = %name.trim(), "no case matched customer name");
                StepReply::new(
                    self.session.stage,
                    Disposition::Reprompt,
                    "I'm not finding an alert under that name. Could you confirm the spelling \
                     of your full name for me?",
                )
            }
        }
    }

    /// Runs the identity check for the current verification stage.
    ///
    /// Verification is single-attempt: a wrong answer at either step
    /// closes the call with no retry offered.
    pub fn verify_step(&mut self, answer: &str) -> StepReply {
        let Some(case) = self.session.case.clone() else {
            return StepReply::new(
                self.session.stage,
                Disposition::Unchanged,
                "I don't have your account pulled up yet. Could you tell me your full name \
                 as it appears on the account first?",
            );
        };

        match self.session.stage {
            Stage::Verification1 => {
                if answer.trim() == case.security_id {
                    self.session.verification1_passed = true;
                    self.session.advance(Stage::Verification2);
                    StepReply::new(
                        self.session.stage,
                        Disposition::Advanced,
                        format!(
                            "That matches, thank you. One more security question: {}",
                            case.question1
                        ),
                    )
                } else {
                    tracing::info!(customer = %case.customer_name, "identifier check failed");
                    self.session.advance(Stage::Closing);
                    StepReply::new(self.session.stage, Disposition::Refused, REFUSAL_MESSAGE)
                }
            }
            Stage::Verification2 => {
                debug_assert!(
                    self.session.verification1_passed,
                    "verification2 is unreachable without passing verification1"
                );
                if answer.trim().to_lowercase() == case.answer1.trim().to_lowercase() {
                    self.session.verification2_passed = true;
                    self.session.advance(Stage::TransactionReview);
                    StepReply::new(
                        self.session.stage,
                        Disposition::Advanced,
                        disclose_transaction(&case),
                    )
                } else {
                    tracing::info!(customer = %case.customer_name, "security answer check failed");
                    self.session.advance(Stage::Closing);
                    StepReply::new(self.session.stage, Disposition::Refused, REFUSAL_MESSAGE)
                }
            }
            _ => StepReply::new(self.session.stage, Disposition::Unchanged, GENERIC_PROMPT),
        }
    }

    /// Records the customer's decision about the flagged transaction.
    ///
    /// Requires a bound case and both verification flags; otherwise the
    /// reply explains the missing prerequisite and nothing changes. A
    /// recognized decision updates the session's copy of the case,
    /// persists the outcome through the store, and closes the call. A
    /// persistence failure is logged and surfaced in the message but does
    /// not roll back the in-memory decision.
    pub fn record_decision(&mut self, decision: &str) -> StepReply {
        let Some(key) = self.session.case.as_ref().map(CaseRecord::key) else {
            return StepReply::new(
                self.session.stage,
                Disposition::Unchanged,
                "I don't have your account pulled up yet. Could you tell me your full name \
                 as it appears on the account first?",
            );
        };
        if !self.session.fully_verified() {
            return StepReply::new(
                self.session.stage,
                Disposition::Unchanged,
                "We still need to finish verifying your identity before I can record anything \
                 about this charge. Please provide the requested verification first.",
            );
        }
        // A case is mutated exactly once; a second decision on the same
        // call re-reads the outcome instead of overwriting it.
        if self
            .session
            .case
            .as_ref()
            .is_some_and(|c| c.status != CaseStatus::PendingReview)
        {
            return StepReply::new(
                self.session.stage,
                Disposition::Unchanged,
                "Your decision about this charge is already recorded. Is there anything else \
                 I can help you with before we finish?",
            );
        }

        let (status, note, confirmation) = match classify_decision(decision) {
            DecisionInput::Unrecognized => {
                return StepReply::new(
                    self.session.stage,
                    Disposition::Reprompt,
                    "Just so I record this correctly — did you make this transaction? \
                     Please answer yes or no.",
                );
            }
            DecisionInput::Affirmative => (
                CaseStatus::ConfirmedSafe,
                "Customer confirmed the transaction as authorized.",
                "Thank you for confirming. I've marked the charge as authorized and your card \
                 remains active — no further action is needed on your part.",
            ),
            DecisionInput::Negative => (
                CaseStatus::ConfirmedFraud,
                "Customer reported the transaction as fraud; card blocked, reissue and \
                 reversal initiated.",
                "Thank you — I've recorded that you did not make this charge. Your card has \
                 been blocked, a replacement is on its way, and a reversal of the charge is \
                 in progress.",
            ),
        };

        let resolved_at = chrono::Utc::now().to_rfc3339();

        // The session's copy reflects the decision regardless of whether
        // the store write below succeeds.
        if let Some(case) = self.session.case.as_mut() {
            case.status = status;
            case.resolved_at = Some(resolved_at.clone());
            case.outcome_note = Some(note.to_string());
        }
        self.session.advance(Stage::Closing);

        let message = match self.store.record_outcome(&key, status, note, &resolved_at) {
            Ok(()) => {
                tracing::info!(
                    customer = %key.customer_name,
                    status = %status,
                    "case outcome persisted"
                );
                confirmation.to_string()
            }
            Err(e) => {
                tracing::warn!(
                    customer = %key.customer_name,
                    status = %status,
                    "failed to persist case outcome: {e}"
                );
                format!(
                    "{confirmation} One note: our records system is briefly catching up, so \
                     the update may take a few minutes to appear."
                )
            }
        };

        StepReply::new(self.session.stage, Disposition::Advanced, message)
    }

    /// Ends the call and returns a closing line appropriate to how far
    /// the call got. Safe to invoke repeatedly.
    pub fn end_call(&mut self) -> StepReply {
        self.session.ended = true;

        let message = match self.session.case.as_ref() {
            Some(case) if self.session.fully_verified() => match case.status {
                CaseStatus::ConfirmedSafe => {
                    "Thanks again for confirming the charge. Your card remains active and the \
                     alert is closed. Have a good day!"
                }
                CaseStatus::ConfirmedFraud => {
                    "Thank you for reporting this. Your card is blocked, the replacement is on \
                     its way, and you'll see the reversal shortly. Take care."
                }
                CaseStatus::PendingReview => {
                    "Thank you for your time today. If you'd like to review the charge later, \
                     please call the number on the back of your card. Goodbye."
                }
            },
            _ => {
                "Thank you for your time today. If you'd like to review the charge later, \
                 please call the number on the back of your card. Goodbye."
            }
        };

        StepReply::new(self.session.stage, Disposition::Closed, message)
    }
}

/// Formats the transaction disclosure read to a verified customer,
/// followed by the yes/no prompt.
fn disclose_transaction(case: &CaseRecord) -> String {
    let tx = &case.transaction;
    format!(
        "You're verified, thank you. Here is the charge we flagged: ${:.2} at {} on {}, made \
         via {}, out of {}, on the card ending {}. Did you make this transaction? Please \
         answer yes or no.",
        tx.amount, tx.merchant, tx.time, tx.source, tx.location, tx.card_last4
    )
}
