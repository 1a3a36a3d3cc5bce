//! UseCase: サーバーのシャットダウン
//!
//! 全ての接続に Close を送り、レジストリを空にする。

use std::sync::Arc;

use crate::domain::ConnectionRegistry;

pub struct ShutdownUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl ShutdownUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the number of connections that were asked to close.
    pub async fn execute(&self) -> usize {
        let handles = self.registry.drain().await;
        let mut closed = 0;
        for handle in &handles {
            match handle.close() {
                Ok(()) => closed += 1,
                Err(e) => tracing::debug!("Skipping close: {}", e),
            }
        }
        tracing::info!("Closed {} of {} open connection(s)", closed, handles.len());
        closed
    }
}
