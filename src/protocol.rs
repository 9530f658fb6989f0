use crate::game::types::{Direction, PlayerId, PlayerView, UserProfile, WorldMap};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const TYPE_HANDSHAKE: &str = "handshake";
pub const TYPE_MOVE: &str = "move";
pub const TYPE_HEARTBEAT: &str = "heartbeat";

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
  #[error("malformed envelope: {0}")]
  MalformedEnvelope(#[source] serde_json::Error),
  #[error("malformed body for `{message_type}`: {source}")]
  MalformedBody {
    message_type: String,
    #[source]
    source: serde_json::Error,
  },
}

/// Outer frame of every message. The body stays opaque until dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
  #[serde(rename = "type")]
  pub message_type: String,
  #[serde(default)]
  pub body: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandshakeRequest {
  #[serde(rename = "userProfile")]
  pub user_profile: UserProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandshakeResponse {
  #[serde(rename = "playerID")]
  pub player_id: PlayerId,
  #[serde(rename = "matchMap")]
  pub match_map: WorldMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRequest {
  pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartbeatResponse {
  pub players: Vec<PlayerView>,
}

#[derive(Debug, Serialize)]
struct OutboundEnvelope<'a, T> {
  #[serde(rename = "type")]
  message_type: &'a str,
  body: &'a T,
}

#[derive(Debug)]
pub enum ClientMessage {
  Handshake(HandshakeRequest),
  Move(MoveRequest),
  Unknown(String),
}

impl ClientMessage {
  pub fn from_envelope(envelope: &Envelope) -> Result<Self, CodecError> {
    match envelope.message_type.as_str() {
      TYPE_HANDSHAKE => decode_body(envelope).map(ClientMessage::Handshake),
      TYPE_MOVE => decode_body(envelope).map(ClientMessage::Move),
      other => Ok(ClientMessage::Unknown(other.to_string())),
    }
  }
}

pub fn decode(raw: &[u8]) -> Result<Envelope, CodecError> {
  serde_json::from_slice(raw).map_err(CodecError::MalformedEnvelope)
}

pub fn decode_body<T: DeserializeOwned>(envelope: &Envelope) -> Result<T, CodecError> {
  T::deserialize(&envelope.body).map_err(|source| CodecError::MalformedBody {
    message_type: envelope.message_type.clone(),
    source,
  })
}

/// Serializes a server message. Only called with this crate's own payload
/// types, which always serialize; a failure here is a bug.
pub fn encode<T: Serialize>(message_type: &str, payload: &T) -> String {
  serde_json::to_string(&OutboundEnvelope {
    message_type,
    body: payload,
  })
  .unwrap_or_else(|error| panic!("failed to encode `{message_type}` message: {error}"))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::game::types::Position;
  use serde_json::json;

  fn profile(name: &str) -> UserProfile {
    UserProfile::new(serde_json::json!({ "username": name }))
  }

  fn world() -> WorldMap {
    WorldMap {
      width: 10,
      height: 10,
      spawn: Position::new(0, 0),
    }
  }

  fn round_trip<T>(message_type: &str, payload: &T) -> T
  where
    T: Serialize + DeserializeOwned,
  {
    let raw = encode(message_type, payload);
    let envelope = decode(raw.as_bytes()).expect("envelope");
    assert_eq!(envelope.message_type, message_type);
    decode_body(&envelope).expect("body")
  }

  #[test]
  fn every_message_type_survives_encode_decode() {
    let handshake = HandshakeRequest {
      user_profile: profile("ada"),
    };
    assert_eq!(round_trip(TYPE_HANDSHAKE, &handshake), handshake);

    let response = HandshakeResponse {
      player_id: PlayerId::new(),
      match_map: world(),
    };
    assert_eq!(round_trip(TYPE_HANDSHAKE, &response), response);

    let movement = MoveRequest {
      direction: Direction::Left,
    };
    assert_eq!(round_trip(TYPE_MOVE, &movement), movement);

    let heartbeat = HeartbeatResponse {
      players: vec![PlayerView {
        id: PlayerId::new(),
        profile: profile("ada"),
        position: Position::new(2, 3),
      }],
    };
    assert_eq!(round_trip(TYPE_HEARTBEAT, &heartbeat), heartbeat);
  }

  #[test]
  fn wire_field_names_match_protocol() {
    let id = PlayerId::new();
    let raw = encode(
      TYPE_HANDSHAKE,
      &HandshakeResponse {
        player_id: id,
        match_map: world(),
      },
    );
    let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(value["type"], "handshake");
    assert_eq!(value["body"]["playerID"], id.to_string());
    assert_eq!(value["body"]["matchMap"]["width"], 10);
    assert_eq!(value["body"]["matchMap"]["spawn"], json!({ "x": 0, "y": 0 }));
  }

  #[test]
  fn decode_client_move() {
    let raw = br#"{"type":"move","body":{"direction":"right"}}"#;
    let envelope = decode(raw).expect("envelope");
    match ClientMessage::from_envelope(&envelope).expect("message") {
      ClientMessage::Move(request) => assert_eq!(request.direction, Direction::Right),
      other => panic!("unexpected message: {other:?}"),
    }
  }

  #[test]
  fn handshake_profile_keeps_extra_fields() {
    let raw = br##"{"type":"handshake","body":{"userProfile":{"username":"ada","color":"#ff0000"}}}"##;
    let envelope = decode(raw).expect("envelope");
    let request: HandshakeRequest = decode_body(&envelope).expect("body");
    assert_eq!(request.user_profile.username(), Some("ada"));
    assert_eq!(request.user_profile.as_value()["color"], "#ff0000");
  }

  #[test]
  fn handshake_accepts_any_profile_shape() {
    let cases: [&[u8]; 4] = [
      br#"{"type":"handshake","body":{"userProfile":{}}}"#,
      br#"{"type":"handshake","body":{"userProfile":{"nickname":"ada"}}}"#,
      br#"{"type":"handshake","body":{"userProfile":{"username":42}}}"#,
      br#"{"type":"handshake","body":{"userProfile":"ada"}}"#,
    ];
    for raw in cases {
      let envelope = decode(raw).expect("envelope");
      match ClientMessage::from_envelope(&envelope).expect("message") {
        ClientMessage::Handshake(request) => {
          assert_eq!(request.user_profile.as_value(), &envelope.body["userProfile"]);
          assert_eq!(request.user_profile.username(), None);
        }
        other => panic!("unexpected message: {other:?}"),
      }
    }
  }

  #[test]
  fn garbage_is_malformed_envelope() {
    let cases: [&[u8]; 4] = [b"not json", br#"{"body":{}}"#, br#"{"type":5}"#, b"[]"];
    for raw in cases {
      assert!(matches!(decode(raw), Err(CodecError::MalformedEnvelope(_))));
    }
  }

  #[test]
  fn wrong_body_shape_is_malformed_body() {
    let envelope = decode(br#"{"type":"move","body":{"direction":"sideways"}}"#).expect("envelope");
    match ClientMessage::from_envelope(&envelope) {
      Err(CodecError::MalformedBody { message_type, .. }) => assert_eq!(message_type, "move"),
      other => panic!("expected malformed body, got {other:?}"),
    }

    let missing = decode(br#"{"type":"handshake"}"#).expect("envelope");
    assert!(matches!(
      ClientMessage::from_envelope(&missing),
      Err(CodecError::MalformedBody { .. })
    ));
  }

  #[test]
  fn unknown_types_pass_framing() {
    let envelope = decode(br#"{"type":"chat","body":"hello"}"#).expect("envelope");
    match ClientMessage::from_envelope(&envelope).expect("message") {
      ClientMessage::Unknown(message_type) => assert_eq!(message_type, "chat"),
      other => panic!("unexpected message: {other:?}"),
    }
  }
}
