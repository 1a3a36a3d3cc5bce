//! UseCase: プレイヤー退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeavePlayerUseCase::execute() メソッド
//! - 退出したプレイヤーがレジストリから消え、残りの参加者に 1 回だけロスターが送られること
//!
//! ### どのような状況を想定しているか
//! - 正常系：a と b のうち a が切断
//! - エッジケース：nickname を既に他の接続に奪われていた場合（何もしない）

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, Nickname};

use super::broadcast_roster::RosterBroadcaster;

/// プレイヤー退出のユースケース
pub struct LeavePlayerUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    broadcaster: Arc<RosterBroadcaster>,
}

impl LeavePlayerUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>, broadcaster: Arc<RosterBroadcaster>) -> Self {
        Self {
            registry,
            broadcaster,
        }
    }

    /// プレイヤー退出を実行
    ///
    /// # Returns
    ///
    /// * `Some(delivered)` - 退出させ、残りの接続にロスターを送った
    /// * `None` - `connection` はこの nickname を保持していなかった（ブロードキャストしない）
    pub async fn execute(&self, nickname: &Nickname, connection: ConnectionId) -> Option<usize> {
        if !self.registry.unregister(nickname, connection).await {
            tracing::debug!(
                "'{}' no longer held by connection {}; nothing to release",
                nickname,
                connection
            );
            return None;
        }
        tracing::info!("'{}' left (connection {})", nickname, connection);

        Some(self.broadcaster.broadcast().await)
    }
}
