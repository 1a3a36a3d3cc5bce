//! WebSocket message types.
//!
//! Every frame is a UTF-8 JSON object with a mandatory `type` field. Inbound frames
//! are decoded leniently into [`ClientMessage`] at the boundary: a field with the
//! wrong JSON type is treated as absent rather than rejecting the whole message.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::domain::{Nickname, Snapshot, StateFields};

/// Message type discriminator shared by both directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Join,
    Update,
    Action,
    Ping,
    PlayersUpdate,
}

/// Why an inbound frame could not be decoded.
///
/// Each of these counts toward the connection's malformed-message budget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("missing or non-string 'type' field")]
    MissingType,

    #[error("binary frames are not supported")]
    Binary,
}

/// A decoded client → server message
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    Ping,
    Join {
        /// `None` when absent, empty or not a string
        nickname: Option<Nickname>,
        fields: StateFields,
    },
    Update(StateFields),
    Action(StateFields),
    /// Well-formed message with a type the relay does not handle
    Unknown(String),
}

impl ClientMessage {
    /// Decode one inbound text frame
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
        let object = match value {
            Value::Object(object) => object,
            other => return Err(DecodeError::NotAnObject(json_kind(&other))),
        };
        let message_type = match object.get("type") {
            Some(Value::String(t)) if !t.is_empty() => t.as_str(),
            _ => return Err(DecodeError::MissingType),
        };

        let message = match message_type {
            "ping" => Self::Ping,
            "join" => Self::Join {
                nickname: string_field(&object, "nickname").and_then(|n| Nickname::new(n).ok()),
                fields: StateFields::from(&object),
            },
            "update" => Self::Update(StateFields::from(&object)),
            "action" => Self::Action(StateFields::from(&object)),
            other => Self::Unknown(other.to_string()),
        };
        Ok(message)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

pub(crate) fn number_field(object: &Map<String, Value>, key: &str) -> Option<Number> {
    match object.get(key) {
        Some(Value::Number(n)) => Some(n.clone()),
        _ => None,
    }
}

pub(crate) fn bool_field(object: &Map<String, Value>, key: &str) -> Option<bool> {
    match object.get(key) {
        Some(Value::Bool(b)) => Some(*b),
        _ => None,
    }
}

/// Afterimage on the wire: `[x, y, alpha, remaining]`
pub type AfterimageTuple = [Number; 4];

/// Player entry of a `players_update` message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub nickname: String,
    pub x: Number,
    pub y: Number,
    pub state: String,
    pub direction: String,
    pub current_frame: Number,
    pub current_time: Number,
    pub is_invulnerable: bool,
    pub afterimages: Vec<AfterimageTuple>,
}

/// Full roster, sent to every connection after each update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayersUpdateMessage {
    pub r#type: MessageType,
    pub players: Vec<PlayerInfo>,
}

impl PlayersUpdateMessage {
    pub fn new(players: Vec<PlayerInfo>) -> Self {
        Self {
            r#type: MessageType::PlayersUpdate,
            players,
        }
    }

    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self::new(snapshot.players.iter().cloned().map(Into::into).collect())
    }
}

/// Client → server envelope, as built by clients.
///
/// Absent fields are omitted so that the server applies its defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientEnvelope {
    pub r#type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_frame: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_time: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_invulnerable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub afterimages: Option<Vec<AfterimageTuple>>,
}

impl ClientEnvelope {
    /// Envelope with only the `type` set
    pub fn new(r#type: MessageType) -> Self {
        Self {
            r#type,
            nickname: None,
            x: None,
            y: None,
            state: None,
            direction: None,
            current_frame: None,
            current_time: None,
            is_invulnerable: None,
            afterimages: None,
        }
    }

    pub fn ping() -> Self {
        Self::new(MessageType::Ping)
    }

    pub fn join(nickname: impl Into<String>) -> Self {
        Self {
            nickname: Some(nickname.into()),
            ..Self::new(MessageType::Join)
        }
    }
}
