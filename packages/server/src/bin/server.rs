//! Multiplayer state relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin courtyard-server
//! cargo run --bin courtyard-server -- --host 0.0.0.0 --port 3000 --idle-timeout-secs 0
//! ```

use std::sync::Arc;

use clap::Parser;
use courtyard_server::{
    config::{DEFAULT_IDLE_TIMEOUT_SECS, RelayConfig},
    domain::session::DEFAULT_MAX_MALFORMED,
    infrastructure::{
        message_pusher::WebSocketMessagePusher, registry::InMemoryConnectionRegistry,
    },
    ui::Server,
    usecase::{
        GetPlayersUseCase, JoinPlayerUseCase, LeavePlayerUseCase, RosterBroadcaster,
        ShutdownUseCase, UpdatePlayerUseCase,
    },
};
use courtyard_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "courtyard-server")]
#[command(about = "WebSocket state relay for a 2D multiplayer game", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Consecutive malformed messages tolerated before a connection is closed
    #[arg(long, default_value_t = DEFAULT_MAX_MALFORMED)]
    max_malformed: u32,

    /// Close connections that send nothing for this many seconds (0 disables)
    #[arg(long, default_value_t = DEFAULT_IDLE_TIMEOUT_SECS)]
    idle_timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let config = RelayConfig::new(args.max_malformed, args.idle_timeout_secs);
    tracing::debug!("Relay config: {:?}", config);

    // Initialize dependencies in order:
    // 1. Registry
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create ConnectionRegistry (in-memory)
    let registry = Arc::new(InMemoryConnectionRegistry::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create UseCases
    let broadcaster = Arc::new(RosterBroadcaster::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let join_player_usecase = Arc::new(JoinPlayerUseCase::new(
        registry.clone(),
        Arc::new(SystemClock),
    ));
    let update_player_usecase = Arc::new(UpdatePlayerUseCase::new(
        registry.clone(),
        broadcaster.clone(),
    ));
    let leave_player_usecase = Arc::new(LeavePlayerUseCase::new(registry.clone(), broadcaster));
    let get_players_usecase = Arc::new(GetPlayersUseCase::new(registry.clone()));
    let shutdown_usecase = Arc::new(ShutdownUseCase::new(registry));

    // 4. Create and run the server
    let server = Server::new(
        join_player_usecase,
        update_player_usecase,
        leave_player_usecase,
        get_players_usecase,
        shutdown_usecase,
        config,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
