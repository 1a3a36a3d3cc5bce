//! UseCase: 参加中プレイヤーの一覧取得（HTTP API 用）

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, RosterEntry};

pub struct GetPlayersUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl GetPlayersUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// 参加中のプレイヤー一覧（nickname 順）
    pub async fn execute(&self) -> Vec<RosterEntry> {
        self.registry.roster().await
    }

    pub async fn count(&self) -> usize {
        self.registry.count().await
    }
}
