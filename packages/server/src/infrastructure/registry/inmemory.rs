//! InMemory ConnectionRegistry 実装
//!
//! 接続ハンドルとプレイヤー状態を 1 つのエントリにまとめ、単一の Mutex で守ります。
//! 2 つのマップが食い違うことは構造上ありえず、スナップショットは常に
//! 1 回のロック取得の中で作られます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    BroadcastTarget, ConnectionHandle, ConnectionId, ConnectionRegistry, Nickname, PlayerEntry,
    PlayerState, RegistryError, RosterEntry, Snapshot, Timestamp,
};

/// Everything the registry knows about one joined player
struct Entry {
    handle: ConnectionHandle,
    state: PlayerState,
    joined_at: Timestamp,
}

/// インメモリ ConnectionRegistry 実装
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    entries: Mutex<HashMap<Nickname, Entry>>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Entries sorted by nickname, so every snapshot lists players in the same order.
fn sorted(entries: &HashMap<Nickname, Entry>) -> Vec<(&Nickname, &Entry)> {
    let mut sorted: Vec<_> = entries.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    sorted
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(
        &self,
        nickname: Nickname,
        handle: ConnectionHandle,
        initial_state: PlayerState,
        joined_at: Timestamp,
    ) -> Option<ConnectionHandle> {
        let connection = handle.id();
        let mut entries = self.entries.lock().await;
        let previous = entries.insert(
            nickname.clone(),
            Entry {
                handle,
                state: initial_state,
                joined_at,
            },
        );
        tracing::debug!("Player '{}' registered (connection {})", nickname, connection);

        previous
            .map(|entry| entry.handle)
            .filter(|displaced| displaced.id() != connection)
    }

    async fn update_state(
        &self,
        nickname: &Nickname,
        connection: ConnectionId,
        new_state: PlayerState,
    ) -> Result<(), RegistryError> {
        let mut entries = self.entries.lock().await;
        match entries.get_mut(nickname) {
            Some(entry) if entry.handle.id() == connection => {
                entry.state = new_state;
                Ok(())
            }
            _ => Err(RegistryError::NotRegistered(nickname.to_string())),
        }
    }

    async fn unregister(&self, nickname: &Nickname, connection: ConnectionId) -> bool {
        let mut entries = self.entries.lock().await;
        let owned = entries
            .get(nickname)
            .is_some_and(|entry| entry.handle.id() == connection);
        if owned {
            entries.remove(nickname);
            tracing::debug!("Player '{}' unregistered (connection {})", nickname, connection);
        }
        owned
    }

    async fn snapshot(&self) -> Snapshot {
        let entries = self.entries.lock().await;
        let sorted = sorted(&entries);
        Snapshot {
            players: sorted
                .iter()
                .map(|(nickname, entry)| PlayerEntry {
                    nickname: (*nickname).clone(),
                    state: entry.state.clone(),
                })
                .collect(),
            targets: sorted
                .iter()
                .map(|(nickname, entry)| BroadcastTarget {
                    nickname: (*nickname).clone(),
                    handle: entry.handle.clone(),
                })
                .collect(),
        }
    }

    async fn drain(&self) -> Vec<ConnectionHandle> {
        let mut entries = self.entries.lock().await;
        entries.drain().map(|(_, entry)| entry.handle).collect()
    }

    async fn roster(&self) -> Vec<RosterEntry> {
        let entries = self.entries.lock().await;
        sorted(&entries)
            .into_iter()
            .map(|(nickname, entry)| RosterEntry {
                nickname: nickname.clone(),
                joined_at: entry.joined_at,
                state: entry.state.clone(),
            })
            .collect()
    }

    async fn count(&self) -> usize {
        self.entries.lock().await.len()
    }
}
