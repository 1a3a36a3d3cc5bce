//! Outbound side of a client connection.
//!
//! The UI layer owns the WebSocket itself. Everything else talks to a connection
//! through a [`ConnectionHandle`], which feeds the connection's pusher loop.

use tokio::sync::mpsc;

use super::{error::MessagePushError, value_object::ConnectionId};

/// A frame queued for delivery to one client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// JSON text frame
    Text(String),
    /// Send a close frame and stop the connection
    Close,
}

/// Channel feeding a connection's pusher loop
pub type PusherChannel = mpsc::UnboundedSender<OutboundFrame>;

/// Cloneable handle to one accepted connection.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: PusherChannel,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, sender: PusherChannel) -> Self {
        Self { id, sender }
    }

    /// Create a handle with a fresh id, returning the receiving end for the pusher loop.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<OutboundFrame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(ConnectionId::generate(), tx), rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue a text frame. Fails fast when the connection is already gone.
    pub fn push(&self, content: &str) -> Result<(), MessagePushError> {
        self.sender
            .send(OutboundFrame::Text(content.to_string()))
            .map_err(|_| MessagePushError::ConnectionClosed(self.id.to_string()))
    }

    /// Ask the pusher loop to close the connection.
    pub fn close(&self) -> Result<(), MessagePushError> {
        self.sender
            .send(OutboundFrame::Close)
            .map_err(|_| MessagePushError::ConnectionClosed(self.id.to_string()))
    }
}
