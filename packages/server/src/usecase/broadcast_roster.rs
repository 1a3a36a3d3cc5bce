//! Full-roster broadcast shared by the update and leave use cases.

use std::sync::Arc;

use crate::{
    domain::{ConnectionRegistry, MessagePusher},
    infrastructure::dto::websocket::PlayersUpdateMessage,
};

/// Sends one `players_update` built from a single snapshot to every registered
/// connection, the originator included.
pub struct RosterBroadcaster {
    registry: Arc<dyn ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RosterBroadcaster {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// Returns the number of connections the roster was delivered to.
    pub async fn broadcast(&self) -> usize {
        // the lock is released here; sending happens on the copy
        let snapshot = self.registry.snapshot().await;

        let message = PlayersUpdateMessage::from_snapshot(&snapshot);
        let payload = match serde_json::to_string(&message) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("Failed to encode players_update: {}", e);
                return 0;
            }
        };

        let delivered = self
            .message_pusher
            .broadcast(&snapshot.targets, &payload)
            .await;
        tracing::debug!(
            "Broadcasted roster of {} player(s) to {}/{} connection(s)",
            snapshot.players.len(),
            delivered,
            snapshot.targets.len()
        );
        delivered
    }
}
