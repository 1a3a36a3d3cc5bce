//! Per-connection session state machine.
//!
//! ```text
//! Connected ──join──▶ Joined(nickname) ──┐
//!     │                   │ (re-join)    │
//!     └───────────────────┴──────────────┴──▶ Closed
//! ```
//!
//! The machine is pure: it decides, the caller (the WebSocket handler) acts.

use super::value_object::{ConnectionId, Nickname};

/// Consecutive malformed messages tolerated before a connection is closed
pub const DEFAULT_MAX_MALFORMED: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// Accepted, waiting for `join`
    Connected,
    Joined(Nickname),
    /// Terminal
    Closed,
}

/// Outcome of recording a malformed message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedVerdict {
    Tolerated { count: u32 },
    LimitReached,
}

#[derive(Debug)]
pub struct ClientSession {
    connection: ConnectionId,
    phase: SessionPhase,
    malformed_count: u32,
    max_malformed: u32,
}

impl ClientSession {
    pub fn new(connection: ConnectionId, max_malformed: u32) -> Self {
        Self {
            connection,
            phase: SessionPhase::Connected,
            malformed_count: 0,
            max_malformed: max_malformed.max(1),
        }
    }

    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn nickname(&self) -> Option<&Nickname> {
        match &self.phase {
            SessionPhase::Joined(nickname) => Some(nickname),
            _ => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.phase == SessionPhase::Closed
    }

    pub fn malformed_count(&self) -> u32 {
        self.malformed_count
    }

    pub fn record_malformed(&mut self) -> MalformedVerdict {
        self.malformed_count += 1;
        if self.malformed_count >= self.max_malformed {
            MalformedVerdict::LimitReached
        } else {
            MalformedVerdict::Tolerated {
                count: self.malformed_count,
            }
        }
    }

    pub fn record_well_formed(&mut self) {
        self.malformed_count = 0;
    }

    /// Enter `Joined` under `nickname`.
    ///
    /// Returns the nickname this session held before, if it was a different one; the
    /// caller must release it from the registry.
    pub fn join(&mut self, nickname: Nickname) -> Option<Nickname> {
        if self.is_closed() {
            return None;
        }
        match std::mem::replace(&mut self.phase, SessionPhase::Joined(nickname.clone())) {
            SessionPhase::Joined(previous) if previous != nickname => Some(previous),
            _ => None,
        }
    }

    /// Enter `Closed`, returning the nickname to release, if any.
    pub fn close(&mut self) -> Option<Nickname> {
        match std::mem::replace(&mut self.phase, SessionPhase::Closed) {
            SessionPhase::Joined(nickname) => Some(nickname),
            _ => None,
        }
    }
}
