//! Server state shared by all handlers.

use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    config::RelayConfig,
    usecase::{
        GetPlayersUseCase, JoinPlayerUseCase, LeavePlayerUseCase, ShutdownUseCase,
        UpdatePlayerUseCase,
    },
};

/// Shared application state
pub struct AppState {
    pub join_player_usecase: Arc<JoinPlayerUseCase>,
    pub update_player_usecase: Arc<UpdatePlayerUseCase>,
    pub leave_player_usecase: Arc<LeavePlayerUseCase>,
    pub get_players_usecase: Arc<GetPlayersUseCase>,
    pub shutdown_usecase: Arc<ShutdownUseCase>,
    pub config: RelayConfig,
    /// Flipped to `true` once the server starts shutting down; every connection,
    /// joined or not, watches it
    pub shutdown: watch::Sender<bool>,
}
