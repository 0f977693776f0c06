//! LiveKit connection settings and the agent pipeline configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default LiveKit dev-server settings (`livekit-server --dev`).
pub const DEV_LIVEKIT_URL: &str = "ws://127.0.0.1:7880";
pub const DEV_LIVEKIT_API_KEY: &str = "devkey";
pub const DEV_LIVEKIT_API_SECRET: &str = "secret";

fn default_token_ttl_seconds() -> u64 {
    3600
}

/// Connection settings for the LiveKit deployment hosting demo calls.
///
/// An empty `url` disables voice transport; calls can still be driven
/// through the tool API without a room.
#[derive(Clone, Serialize, Deserialize)]
pub struct LiveKitConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default, skip_serializing)]
    pub api_secret: String,
    /// JWT token TTL in seconds for join tokens. Default: 3600 (1 hour).
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: u64,
}

impl Default for LiveKitConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            token_ttl_seconds: default_token_ttl_seconds(),
        }
    }
}

impl fmt::Debug for LiveKitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveKitConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

impl LiveKitConfig {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            token_ttl_seconds: default_token_ttl_seconds(),
        }
    }

    /// Settings for a local `livekit-server --dev` instance.
    pub fn dev() -> Self {
        Self::new(DEV_LIVEKIT_URL, DEV_LIVEKIT_API_KEY, DEV_LIVEKIT_API_SECRET)
    }
}

fn default_stt_model() -> String {
    "nova-3".to_string()
}

fn default_llm_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_tts_voice() -> String {
    "en-US-marcus".to_string()
}

fn default_tts_style() -> String {
    "Conversational".to_string()
}

fn default_turn_detection() -> String {
    "multilingual".to_string()
}

fn default_true() -> bool {
    true
}

/// Plugin selection for the platform-side agent pipeline.
///
/// These values are handed verbatim to the external platform; nothing in
/// this repository interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Speech-to-text model.
    #[serde(default = "default_stt_model")]
    pub stt_model: String,
    /// Language model driving the conversation.
    #[serde(default = "default_llm_model")]
    pub llm_model: String,
    /// Text-to-speech voice.
    #[serde(default = "default_tts_voice")]
    pub tts_voice: String,
    /// Text-to-speech speaking style.
    #[serde(default = "default_tts_style")]
    pub tts_style: String,
    /// Turn-detection model family.
    #[serde(default = "default_turn_detection")]
    pub turn_detection: String,
    /// Whether platform noise cancellation is requested.
    #[serde(default = "default_true")]
    pub noise_cancellation: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stt_model: default_stt_model(),
            llm_model: default_llm_model(),
            tts_voice: default_tts_voice(),
            tts_style: default_tts_style(),
            turn_detection: default_turn_detection(),
            noise_cancellation: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_the_secret() {
        let config = LiveKitConfig::new("ws://example", "key", "very-secret");
        let printed = format!("{config:?}");
        assert!(printed.contains("[REDACTED]"));
        assert!(!printed.contains("very-secret"));
    }

    #[test]
    fn secret_is_never_serialized() {
        let config = LiveKitConfig::dev();
        let json = serde_json::to_string(&config).expect("should serialize");
        assert!(!json.contains("api_secret"));
        assert!(!json.contains("secret\""));
    }

    #[test]
    fn pipeline_defaults_match_the_demo_stack() {
        let pipeline = PipelineConfig::default();
        assert_eq!(pipeline.stt_model, "nova-3");
        assert_eq!(pipeline.llm_model, "gemini-2.5-flash");
        assert_eq!(pipeline.tts_voice, "en-US-marcus");
        assert!(pipeline.noise_cancellation);
    }
}
