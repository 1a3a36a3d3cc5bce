//! Headless Courtyard client.
//!
//! Joins the relay under a nickname, pings every 20 seconds, and turns typed
//! commands into `update` / `action` messages. Automatically reconnects on
//! disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin courtyard-client -- --nickname alice
//! cargo run --bin courtyard-client -- -n bob --x 200 --y 150
//! ```

use std::time::Duration;

use clap::Parser;
use serde_json::Number;

use courtyard_client::{ClientOptions, run_client, runner::DEFAULT_PING_INTERVAL_SECS};
use courtyard_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "courtyard-client")]
#[command(about = "Headless client for the Courtyard multiplayer relay", long_about = None)]
struct Args {
    /// Nickname to join under
    #[arg(short = 'n', long)]
    nickname: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Initial x position
    #[arg(long, default_value_t = 100)]
    x: i64,

    /// Initial y position
    #[arg(long, default_value_t = 100)]
    y: i64,

    /// Seconds between keep-alive pings
    #[arg(long, default_value_t = DEFAULT_PING_INTERVAL_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    ping_interval_secs: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let options = ClientOptions {
        url: args.url,
        nickname: args.nickname,
        x: Number::from(args.x),
        y: Number::from(args.y),
        ping_interval: Duration::from_secs(args.ping_interval_secs),
    };

    // Run the client
    if let Err(e) = run_client(options).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
