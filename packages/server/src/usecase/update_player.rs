//! UseCase: プレイヤー状態更新とブロードキャスト
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UpdatePlayerUseCase::execute() メソッド
//! - 位置を含む更新で状態が丸ごと置き換わり、全員にロスターが送られること
//! - 位置を欠く更新でも状態は変えずにブロードキャストだけは行われること
//!
//! ### どのような状況を想定しているか
//! - 正常系：a と b が参加し、a が移動する
//! - エッジケース：x / y の欠落、同じ更新の繰り返し（重複排除しない）

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, Nickname, PlayerState, StateFields};

use super::broadcast_roster::RosterBroadcaster;

/// Result of handling one `update` / `action`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Whether the stored state was replaced
    pub state_updated: bool,
    /// Connections the roster was delivered to
    pub delivered: usize,
}

/// プレイヤー状態更新のユースケース
pub struct UpdatePlayerUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    broadcaster: Arc<RosterBroadcaster>,
}

impl UpdatePlayerUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>, broadcaster: Arc<RosterBroadcaster>) -> Self {
        Self {
            registry,
            broadcaster,
        }
    }

    /// 状態更新を実行し、ロスターを全員にブロードキャストする
    ///
    /// `fields` に x と y の両方が無い場合、状態は変更しないがブロードキャストは行う。
    pub async fn execute(
        &self,
        nickname: &Nickname,
        connection: ConnectionId,
        fields: StateFields,
    ) -> UpdateOutcome {
        let state_updated = if fields.has_position() {
            match self
                .registry
                .update_state(nickname, connection, PlayerState::from_fields(fields))
                .await
            {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Dropped state update from connection {}: {}", connection, e);
                    false
                }
            }
        } else {
            tracing::debug!("Update from '{}' carries no position; state unchanged", nickname);
            false
        };

        let delivered = self.broadcaster.broadcast().await;

        UpdateOutcome {
            state_updated,
            delivered,
        }
    }
}
