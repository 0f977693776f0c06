//! Fraud-verification call workflow for the Parley demo agents.
//!
//! Implements the one piece of real state logic in the repository: the
//! per-call verification workflow the fraud-desk agent walks a customer
//! through. A call looks up a case by customer name, performs two
//! sequential identity checks, discloses the flagged transaction, records
//! the customer's fraud/not-fraud decision, and persists the outcome.
//!
//! The workflow is synchronous and single-threaded per call: the external
//! LLM orchestrator invokes one operation per conversational turn, and
//! each operation returns a [`StepReply`] whose `message` is fed back into
//! the conversation. Verification is single-attempt — a wrong answer at
//! either check moves the call to the terminal `Closing` stage with no
//! retry path.
//!
//! # Modules
//!
//! - [`case`] — the `CaseRecord` data model.
//! - [`store`] — the `CaseStore` abstraction with SQLite and in-memory
//!   implementations.
//! - [`stage`] — the closed `Stage` enum and its transition table.
//! - [`session`] — `CallSession` state and the `FraudCall` operations.

pub mod case;
pub mod session;
pub mod stage;
pub mod store;

pub use case::{CaseKey, CaseRecord, TransactionDetails};
pub use session::{CallSession, Disposition, FraudCall, StepReply};
pub use stage::Stage;
pub use store::{load_directory, CaseStore, MemoryCaseStore, SqliteCaseStore, StoreError};
