//! UseCase: プレイヤー参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinPlayerUseCase::execute() メソッド
//! - デフォルト値の補完、nickname 衝突時の以前の接続の切断、再 join 時の旧 nickname の解放
//!
//! ### どのような状況を想定しているか
//! - 正常系：nickname だけの join
//! - エッジケース：同じ nickname で別の接続が join
//! - エッジケース：同じ接続が別の nickname で再 join

use std::sync::Arc;

use courtyard_shared::time::Clock;

use crate::domain::{
    ConnectionHandle, ConnectionRegistry, Nickname, PlayerState, StateFields, Timestamp,
};

/// Result of a successful join
#[derive(Debug)]
pub struct JoinOutcome {
    pub state: PlayerState,
    /// Connection that held the nickname before and has been told to close
    pub displaced: Option<ConnectionHandle>,
}

/// プレイヤー参加のユースケース
///
/// join ではブロードキャストしない。新しいプレイヤーは最初の update で他の参加者に見える。
pub struct JoinPlayerUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    clock: Arc<dyn Clock>,
}

impl JoinPlayerUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// プレイヤー参加を実行
    ///
    /// # Arguments
    ///
    /// * `handle` - join した接続のハンドル
    /// * `nickname` - 参加する nickname
    /// * `previous` - この接続が以前 join していた別の nickname（解放される）
    /// * `fields` - join メッセージが運んできた状態フィールド
    pub async fn execute(
        &self,
        handle: ConnectionHandle,
        nickname: Nickname,
        previous: Option<Nickname>,
        fields: StateFields,
    ) -> JoinOutcome {
        let connection = handle.id();

        if let Some(previous) = previous
            && self.registry.unregister(&previous, connection).await
        {
            tracing::info!(
                "Connection {} renamed itself from '{}' to '{}'",
                connection,
                previous,
                nickname
            );
        }

        let state = PlayerState::from_fields(fields);
        let joined_at = Timestamp::new(self.clock.now_millis());
        let displaced = self
            .registry
            .register(nickname.clone(), handle, state.clone(), joined_at)
            .await;

        if let Some(displaced) = &displaced {
            tracing::warn!(
                "Nickname '{}' taken over by connection {}; closing previous holder {}",
                nickname,
                connection,
                displaced.id()
            );
            if let Err(e) = displaced.close() {
                tracing::debug!("Previous holder of '{}' already gone: {}", nickname, e);
            }
        }

        tracing::info!("'{}' joined (connection {})", nickname, connection);
        JoinOutcome { state, displaced }
    }
}
