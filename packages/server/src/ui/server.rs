//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::{net::TcpListener, sync::watch};
use tower_http::trace::TraceLayer;

use crate::{
    config::RelayConfig,
    usecase::{
        GetPlayersUseCase, JoinPlayerUseCase, LeavePlayerUseCase, ShutdownUseCase,
        UpdatePlayerUseCase,
    },
};

use super::{
    handler::{devtools_probe, get_players, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     join_player_usecase,
///     update_player_usecase,
///     leave_player_usecase,
///     get_players_usecase,
///     shutdown_usecase,
///     RelayConfig::default(),
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(
        join_player_usecase: Arc<JoinPlayerUseCase>,
        update_player_usecase: Arc<UpdatePlayerUseCase>,
        leave_player_usecase: Arc<LeavePlayerUseCase>,
        get_players_usecase: Arc<GetPlayersUseCase>,
        shutdown_usecase: Arc<ShutdownUseCase>,
        config: RelayConfig,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                join_player_usecase,
                update_player_usecase,
                leave_player_usecase,
                get_players_usecase,
                shutdown_usecase,
                config,
                shutdown: watch::channel(false).0,
            }),
        }
    }

    fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/players", get(get_players))
            .route(
                "/.well-known/appspecific/com.chrome.devtools.json",
                get(devtools_probe),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the relay server until Ctrl+C / SIGTERM
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `signal` resolves.
    ///
    /// On shutdown every open connection is sent a close frame and all player state is
    /// dropped.
    pub async fn serve<F>(
        self,
        listener: TcpListener,
        signal: F,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!("Relay server listening on {}", listener.local_addr()?);

        let app = self.router();
        let state = self.state.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                signal.await;
                // joined players first, so their teardown finds nothing left to broadcast
                state.shutdown_usecase.execute().await;
                state.shutdown.send_replace(true);
            })
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
