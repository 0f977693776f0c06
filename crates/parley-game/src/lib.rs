//! Session state and tools for the tabletop-game narrator agent.
//!
//! The narrator is an LLM-driven game master; this crate is everything it
//! needs that the language model cannot keep straight on its own — the
//! player sheet, world state, quest log, and dice. Each tool mutates the
//! session and returns a single natural-language string that the external
//! orchestrator feeds back into the conversation.
//!
//! Game saves are plain JSON snapshots on disk; see [`save`].

pub mod save;
pub mod state;
pub mod tools;

pub use save::{GameSave, SaveError};
pub use state::{GameState, NpcRecord, PlayerCharacter, Scenario};
pub use tools::GameSession;
