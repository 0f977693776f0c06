//! Join tokens are plain JWTs; decode one and check its claims.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use parley_types::BotKind;
use parley_voice::{LiveKitConfig, RoomBroker, DEV_LIVEKIT_API_KEY, DEV_LIVEKIT_API_SECRET};

fn decode_claims(token: &str) -> serde_json::Value {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    jsonwebtoken::decode::<serde_json::Value>(
        token,
        &DecodingKey::from_secret(DEV_LIVEKIT_API_SECRET.as_bytes()),
        &validation,
    )
    .expect("token should decode with the configured secret")
    .claims
}

#[test]
fn caller_token_grants_access_to_the_call_room() {
    let broker = RoomBroker::new(LiveKitConfig::dev());
    let room = RoomBroker::room_name(BotKind::FraudDesk, "test-call");

    let token = broker
        .join_token(&room, "caller-test-call", "Caller")
        .expect("token should mint");
    let claims = decode_claims(&token);

    assert_eq!(claims["iss"], DEV_LIVEKIT_API_KEY);
    assert_eq!(claims["sub"], "caller-test-call");
    assert_eq!(claims["video"]["room"], "fraud_desk-test-call");
    assert_eq!(claims["video"]["roomJoin"], true);
    assert_eq!(claims["video"]["canPublish"], true);
    assert_eq!(claims["video"]["canSubscribe"], true);
}

#[test]
fn tokens_are_scoped_to_their_own_room() {
    let broker = RoomBroker::new(LiveKitConfig::dev());

    let narrator = broker
        .join_token(
            &RoomBroker::room_name(BotKind::Narrator, "a"),
            "caller-a",
            "Caller",
        )
        .expect("token should mint");
    let fraud = broker
        .join_token(
            &RoomBroker::room_name(BotKind::FraudDesk, "b"),
            "caller-b",
            "Caller",
        )
        .expect("token should mint");

    assert_eq!(decode_claims(&narrator)["video"]["room"], "narrator-a");
    assert_eq!(decode_claims(&fraud)["video"]["room"], "fraud_desk-b");
}
