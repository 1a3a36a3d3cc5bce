//! WebSocket を使った MessagePusher 実装
//!
//! ## 設計ノート
//!
//! WebSocket 自体は UI 層（`ui/handler/websocket.rs`）が所有します。
//! この実装は各接続の `ConnectionHandle` にメッセージを積むだけで、
//! 実際の書き込みは接続ごとの pusher ループが行います。
//! そのため送信はブロックせず、閉じた接続への送信は即座に失敗します。

use async_trait::async_trait;

use crate::domain::{BroadcastTarget, MessagePusher};

/// WebSocket を使った MessagePusher 実装
#[derive(Debug, Default, Clone, Copy)]
pub struct WebSocketMessagePusher;

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn broadcast(&self, targets: &[BroadcastTarget], content: &str) -> usize {
        let mut delivered = 0;
        for target in targets {
            // ブロードキャストでは一部の送信失敗を許容
            match target.handle.push(content) {
                Ok(()) => {
                    delivered += 1;
                    tracing::trace!("Pushed message to '{}'", target.nickname);
                }
                Err(e) => {
                    tracing::warn!("Failed to push message to '{}': {}", target.nickname, e);
                }
            }
        }
        delivered
    }
}
