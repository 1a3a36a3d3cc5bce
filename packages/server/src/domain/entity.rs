//! Domain entities.

use serde_json::Number;

use super::value_object::{Nickname, Timestamp};

pub const DEFAULT_X: u64 = 100;
pub const DEFAULT_Y: u64 = 100;
pub const DEFAULT_ANIMATION_STATE: &str = "idle";
pub const DEFAULT_DIRECTION: &str = "down";

/// One point of the visual trail a player leaves behind (e.g. while dodging).
///
/// The relay never interprets these values, it only passes them through.
#[derive(Debug, Clone, PartialEq)]
pub struct Afterimage {
    pub x: Number,
    pub y: Number,
    pub alpha: Number,
    pub remaining: Number,
}

/// Player state as last reported by its owner.
///
/// Numbers are kept as JSON numbers so that whatever the client sent (integer or
/// float) is relayed unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub x: Number,
    pub y: Number,
    /// Animation state (`idle`, `run`, `attack1`, ...), opaque to the server
    pub state: String,
    pub direction: String,
    pub current_frame: Number,
    pub current_time: Number,
    pub is_invulnerable: bool,
    pub afterimages: Vec<Afterimage>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::from_fields(StateFields::default())
    }
}

impl PlayerState {
    /// Build a full state from the fields a message carried, filling the gaps with
    /// the defaults.
    pub fn from_fields(fields: StateFields) -> Self {
        Self {
            x: fields.x.unwrap_or_else(|| Number::from(DEFAULT_X)),
            y: fields.y.unwrap_or_else(|| Number::from(DEFAULT_Y)),
            state: fields
                .state
                .unwrap_or_else(|| DEFAULT_ANIMATION_STATE.to_string()),
            direction: fields
                .direction
                .unwrap_or_else(|| DEFAULT_DIRECTION.to_string()),
            current_frame: fields.current_frame.unwrap_or_else(|| Number::from(0u64)),
            current_time: fields.current_time.unwrap_or_else(|| Number::from(0u64)),
            is_invulnerable: fields.is_invulnerable.unwrap_or(false),
            afterimages: fields.afterimages.unwrap_or_default(),
        }
    }
}

/// State fields carried by a `join`, `update` or `action` message.
///
/// `None` means the field was absent (or had the wrong JSON type).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateFields {
    pub x: Option<Number>,
    pub y: Option<Number>,
    pub state: Option<String>,
    pub direction: Option<String>,
    pub current_frame: Option<Number>,
    pub current_time: Option<Number>,
    pub is_invulnerable: Option<bool>,
    pub afterimages: Option<Vec<Afterimage>>,
}

impl StateFields {
    /// Whether the message reported a position at all
    pub fn has_position(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }
}

/// One line of a roster snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerEntry {
    pub nickname: Nickname,
    pub state: PlayerState,
}

/// Roster line with bookkeeping, for the debug API
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub nickname: Nickname,
    pub joined_at: Timestamp,
    pub state: PlayerState,
}
