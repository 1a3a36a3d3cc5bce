//! The client's own player, as last reported to the server.

use courtyard_server::infrastructure::dto::websocket::{ClientEnvelope, MessageType};
use serde_json::Number;

use crate::command::Command;

#[derive(Debug, Clone, PartialEq)]
pub struct LocalPlayer {
    pub nickname: String,
    pub x: Number,
    pub y: Number,
    pub state: String,
    pub direction: String,
}

impl LocalPlayer {
    pub fn new(nickname: String, x: Number, y: Number) -> Self {
        Self {
            nickname,
            x,
            y,
            state: "idle".to_string(),
            direction: "down".to_string(),
        }
    }

    /// `join` carrying the current state, so a reconnect resumes where we left off
    pub fn join(&self) -> ClientEnvelope {
        ClientEnvelope {
            nickname: Some(self.nickname.clone()),
            ..self.envelope(MessageType::Join)
        }
    }

    /// Apply a command and build the message to send, if any.
    pub fn apply(&mut self, command: Command) -> Option<ClientEnvelope> {
        match command {
            Command::Move { x, y } => {
                self.x = x;
                self.y = y;
                Some(self.envelope(MessageType::Update))
            }
            Command::State(state) => {
                self.state = state;
                Some(self.envelope(MessageType::Update))
            }
            Command::Face(direction) => {
                self.direction = direction;
                Some(self.envelope(MessageType::Update))
            }
            // actions are one-off: the stored animation state is left alone
            Command::Action(name) => Some(ClientEnvelope {
                state: Some(name),
                ..self.envelope(MessageType::Action)
            }),
            Command::Help | Command::Quit => None,
        }
    }

    fn envelope(&self, r#type: MessageType) -> ClientEnvelope {
        ClientEnvelope {
            x: Some(self.x.clone()),
            y: Some(self.y.clone()),
            state: Some(self.state.clone()),
            direction: Some(self.direction.clone()),
            ..ClientEnvelope::new(r#type)
        }
    }
}
