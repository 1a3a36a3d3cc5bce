//! ConnectionRegistry trait 定義
//!
//! 参加中のクライアント（nickname → 接続ハンドル）とそのプレイヤー状態
//! （nickname → PlayerState）を管理するインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    connection::ConnectionHandle,
    entity::{PlayerEntry, PlayerState, RosterEntry},
    error::RegistryError,
    value_object::{ConnectionId, Nickname, Timestamp},
};

/// Delivery target of a broadcast
#[derive(Debug, Clone)]
pub struct BroadcastTarget {
    pub nickname: Nickname,
    pub handle: ConnectionHandle,
}

/// Point-in-time copy of the registry, taken under a single lock.
///
/// `players` and `targets` always describe the same set of nicknames.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Sorted by nickname
    pub players: Vec<PlayerEntry>,
    pub targets: Vec<BroadcastTarget>,
}

impl Snapshot {
    pub fn nicknames(&self) -> Vec<&str> {
        self.players.iter().map(|p| p.nickname.as_str()).collect()
    }
}

/// ConnectionRegistry trait
///
/// RelayServer（UseCase 層）はこの trait に依存し、具体的な実装には依存しない。
///
/// 不変条件: 登録されている nickname の集合は、join 済みで接続中のセッションの
/// nickname の集合と常に一致する。
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 参加者を登録（既存の nickname は上書き）
    ///
    /// 同じ nickname を別の接続が保持していた場合、その接続のハンドルを返す。
    async fn register(
        &self,
        nickname: Nickname,
        handle: ConnectionHandle,
        initial_state: PlayerState,
        joined_at: Timestamp,
    ) -> Option<ConnectionHandle>;

    /// プレイヤー状態を丸ごと置き換える
    ///
    /// nickname が `connection` によって登録されていない場合は `NotRegistered`。
    async fn update_state(
        &self,
        nickname: &Nickname,
        connection: ConnectionId,
        new_state: PlayerState,
    ) -> Result<(), RegistryError>;

    /// 参加者を削除（`connection` が保持している場合のみ）
    ///
    /// 実際に削除した場合に `true` を返す。
    async fn unregister(&self, nickname: &Nickname, connection: ConnectionId) -> bool;

    /// 全参加者のスナップショットを取得
    async fn snapshot(&self) -> Snapshot;

    /// 全参加者を削除し、全ての接続ハンドルを返す
    async fn drain(&self) -> Vec<ConnectionHandle>;

    /// デバッグ用の参加者一覧を取得
    async fn roster(&self) -> Vec<RosterEntry>;

    /// 参加者数を取得
    async fn count(&self) -> usize;
}
