//! Voice platform glue for the Parley demo agents.
//!
//! The demos run on LiveKit: callers join a WebRTC room, and the agent
//! pipeline (speech-to-text, the language model, text-to-speech, turn
//! detection, noise cancellation) is supplied entirely by the platform
//! and its plugins. This crate carries the configuration those external
//! pieces need and brokers the rooms and join tokens for demo calls —
//! it performs no audio processing of its own.

pub mod broker;
pub mod config;
pub mod error;

pub use broker::{CallTicket, RoomBroker};
pub use config::{
    LiveKitConfig, PipelineConfig, DEV_LIVEKIT_API_KEY, DEV_LIVEKIT_API_SECRET, DEV_LIVEKIT_URL,
};
pub use error::VoiceError;
