//! Demo-call room brokerage.
//!
//! Each demo call gets its own LiveKit room, named `<bot>-<call id>`.
//! The broker creates the room, mints join tokens for the human caller
//! and for the platform-side agent, and tears participants down when the
//! call ends.

use livekit_api::access_token::{AccessToken, VideoGrants};
use livekit_api::services::room::{CreateRoomOptions, RoomClient};
use parley_types::BotKind;
use std::time::Duration;

use crate::config::LiveKitConfig;
use crate::error::VoiceError;

/// Everything a caller needs to join a demo call.
#[derive(Debug, Clone)]
pub struct CallTicket {
    /// The room created for this call.
    pub room_name: String,
    /// Join token for the human caller.
    pub caller_token: String,
    /// Join token for the agent participant.
    pub agent_token: String,
    /// The LiveKit URL callers connect to.
    pub url: String,
}

/// Creates rooms and join tokens for demo calls.
#[derive(Debug)]
pub struct RoomBroker {
    config: LiveKitConfig,
    room_client: RoomClient,
}

impl RoomBroker {
    pub fn new(config: LiveKitConfig) -> Self {
        let room_client =
            RoomClient::with_api_key(&config.url, &config.api_key, &config.api_secret);
        Self {
            config,
            room_client,
        }
    }

    /// Whether a LiveKit deployment is configured at all.
    pub fn is_enabled(&self) -> bool {
        !self.config.url.is_empty()
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// The room name used for a given call.
    pub fn room_name(bot: BotKind, call_id: &str) -> String {
        format!("{}-{}", bot.as_str(), call_id)
    }

    /// Opens a room for a new demo call and mints both join tokens.
    pub async fn open_call(&self, bot: BotKind, call_id: &str) -> Result<CallTicket, VoiceError> {
        if !self.is_enabled() {
            return Err(VoiceError::Disabled);
        }

        let room_name = Self::room_name(bot, call_id);
        let room: livekit_protocol::Room = self
            .room_client
            .create_room(&room_name, CreateRoomOptions::default())
            .await
            .map_err(|e| VoiceError::RoomService(e.to_string()))?;

        tracing::info!(room = %room_name, sid = %room.sid, bot = %bot, "opened demo call room");

        let caller_token = self.join_token(&room_name, &format!("caller-{call_id}"), "Caller")?;
        let agent_token = self.join_token(
            &room_name,
            &format!("{}-agent", bot.as_str()),
            display_name(bot),
        )?;

        Ok(CallTicket {
            room_name,
            caller_token,
            agent_token,
            url: self.config.url.clone(),
        })
    }

    /// Mints a join token for `room_name`.
    ///
    /// Token minting is pure JWT signing; it does not require the room to
    /// exist or the deployment to be reachable.
    pub fn join_token(
        &self,
        room_name: &str,
        participant_identity: &str,
        participant_name: &str,
    ) -> Result<String, VoiceError> {
        let token = AccessToken::with_api_key(&self.config.api_key, &self.config.api_secret)
            .with_identity(participant_identity)
            .with_name(participant_name)
            .with_grants(VideoGrants {
                room_join: true,
                room: room_name.to_string(),
                can_publish: true,
                can_subscribe: true,
                can_publish_data: true,
                ..Default::default()
            })
            .with_ttl(Duration::from_secs(self.config.token_ttl_seconds));

        token.to_jwt().map_err(VoiceError::LiveKit)
    }

    /// Removes a participant from a call's room.
    pub async fn remove_participant(&self, room: &str, identity: &str) -> Result<(), VoiceError> {
        self.room_client
            .remove_participant(room, identity)
            .await
            .map_err(|e| VoiceError::RoomService(e.to_string()))
    }

    /// Returns the number of participants currently in a room.
    /// Returns 0 if the room does not exist.
    pub async fn participant_count(&self, room_name: &str) -> Result<u32, VoiceError> {
        match self.room_client.list_participants(room_name).await {
            Ok(participants) => Ok(participants.len() as u32),
            Err(_) => Ok(0),
        }
    }
}

fn display_name(bot: BotKind) -> &'static str {
    match bot {
        BotKind::Narrator => "Game Master",
        BotKind::FraudDesk => "Card Security Desk",
    }
}
