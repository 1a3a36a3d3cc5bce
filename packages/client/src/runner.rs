//! Client execution logic with reconnection support.

use std::time::Duration;

use serde_json::Number;

use crate::{player::LocalPlayer, session::run_client_session, ui::spawn_input_thread};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Default client ping interval, in seconds
pub const DEFAULT_PING_INTERVAL_SECS: u64 = 20;

/// Everything the client needs to start
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub url: String,
    pub nickname: String,
    pub x: Number,
    pub y: Number,
    pub ping_interval: Duration,
}

/// Run the WebSocket client with reconnection logic
pub async fn run_client(options: ClientOptions) -> Result<(), Box<dyn std::error::Error>> {
    let ClientOptions {
        url,
        nickname,
        x,
        y,
        ping_interval,
    } = options;

    // The prompt and the player survive reconnects
    let mut input_rx = spawn_input_thread(&nickname);
    let mut player = LocalPlayer::new(nickname, x, y);
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            url,
            player.nickname,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, &mut player, &mut input_rx, ping_interval).await {
            Ok(_) => {
                tracing::info!("Client session ended normally");
                // If connection ended normally (user exit), don't reconnect
                break;
            }
            Err(e) => {
                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if reconnect_count >= MAX_RECONNECT_ATTEMPTS {
                    return Err(format!(
                        "failed to reconnect after {} attempts",
                        MAX_RECONNECT_ATTEMPTS
                    )
                    .into());
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}
