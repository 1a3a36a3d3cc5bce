//! WebSocket client session management.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use courtyard_server::infrastructure::dto::websocket::{
    ClientEnvelope, MessageType, PlayerInfo, PlayersUpdateMessage,
};

use crate::{
    command::Command, error::ClientError, formatter::MessageFormatter, player::LocalPlayer,
    ui::redisplay_prompt,
};

/// Run one WebSocket session.
///
/// Returns `Ok` when the user quits (or closes the prompt) and
/// `ClientError::ConnectionError` when the connection is lost, in which case the
/// caller may reconnect with the same `player` and `input_rx`.
pub async fn run_client_session(
    url: &str,
    player: &mut LocalPlayer,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
    ping_interval: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to relay server!");
    println!(
        "\nYou are '{}'. Type 'help' for commands. Press Ctrl+C to exit.\n",
        player.nickname
    );

    let (mut write, mut read) = ws_stream.split();

    // 1. Join with the current state, so a reconnect resumes where we left off
    let join = serde_json::to_string(&player.join()).map_err(ClientError::from)?;
    write
        .send(Message::Text(join.into()))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    // 2. Spawn a task to handle incoming messages
    let nickname_for_read = player.nickname.clone();
    let mut read_task = tokio::spawn(async move {
        let mut last_roster: Option<Vec<PlayerInfo>> = None;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<PlayersUpdateMessage>(&text) {
                        Ok(update) if update.r#type == MessageType::PlayersUpdate => {
                            // the server rebroadcasts on every update, so only print changes
                            if last_roster.as_ref() != Some(&update.players) {
                                print!(
                                    "{}",
                                    MessageFormatter::format_roster(
                                        &update.players,
                                        &nickname_for_read
                                    )
                                );
                                redisplay_prompt(&nickname_for_read);
                                last_roster = Some(update.players);
                            }
                        }
                        _ => {
                            print!("{}", MessageFormatter::format_raw_message(&text));
                            redisplay_prompt(&nickname_for_read);
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    // 3. Send pings and typed commands until the user quits or a send fails
    let nickname = player.nickname.clone();
    let write_loop = async {
        let mut ping = tokio::time::interval(ping_interval);
        // the first tick completes immediately
        ping.tick().await;

        loop {
            let envelope = tokio::select! {
                _ = ping.tick() => ClientEnvelope::ping(),
                line = input_rx.recv() => {
                    let Some(line) = line else {
                        // prompt closed (Ctrl+C / Ctrl+D)
                        return Ok(());
                    };
                    match Command::parse(&line) {
                        Ok(Command::Quit) => return Ok(()),
                        Ok(Command::Help) => {
                            println!("{}", MessageFormatter::format_help());
                            redisplay_prompt(&nickname);
                            continue;
                        }
                        Ok(command) => match player.apply(command) {
                            Some(envelope) => envelope,
                            None => continue,
                        },
                        Err(e) => {
                            print!("{}", MessageFormatter::format_error(&e.to_string()));
                            redisplay_prompt(&nickname);
                            continue;
                        }
                    }
                }
            };

            let json = match serde_json::to_string(&envelope) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send message: {}", e);
                return Err(ClientError::ConnectionError(e.to_string()));
            }
        }
    };

    // 4. Whichever side finishes first ends the session
    let outcome = tokio::select! {
        _ = &mut read_task => Err(ClientError::ConnectionError("Connection lost".to_string())),
        result = write_loop => {
            read_task.abort();
            result
        }
    };
    outcome?;

    Ok(())
}
