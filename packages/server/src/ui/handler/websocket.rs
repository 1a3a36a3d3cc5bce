//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionHandle, OutboundFrame},
    ui::state::AppState,
};

use super::session::{Flow, SessionDriver};

/// How long teardown waits for queued frames (e.g. a close frame) to be written
const FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives frames from the rx channel and pushes them to the WebSocket sender.
///
/// The task ends after writing a close frame, when the channel is closed and drained,
/// or when the socket stops accepting writes.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<OutboundFrame>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match frame {
                OutboundFrame::Text(text) => {
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                OutboundFrame::Close => {
                    if let Err(e) = sender.send(Message::Close(None)).await {
                        tracing::debug!("Failed to send close frame: {}", e);
                    }
                    break;
                }
            }
        }
    })
}

/// What the receive side of a connection produced
enum Inbound {
    Frame(Message),
    Idle,
    Ended,
    Shutdown,
}

async fn next_inbound(
    receiver: &mut SplitStream<WebSocket>,
    idle_timeout: Option<Duration>,
) -> Inbound {
    let next = match idle_timeout {
        Some(limit) => match tokio::time::timeout(limit, receiver.next()).await {
            Ok(next) => next,
            Err(_) => return Inbound::Idle,
        },
        None => receiver.next().await,
    };
    match next {
        Some(Ok(message)) => Inbound::Frame(message),
        Some(Err(e)) => {
            tracing::debug!("WebSocket error: {}", e);
            Inbound::Ended
        }
        None => Inbound::Ended,
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();
    let (handle, rx) = ConnectionHandle::channel();
    let connection = handle.id();
    let idle_timeout = state.config.idle_timeout;
    let mut shutdown_rx = state.shutdown.subscribe();
    tracing::info!("Connection {} accepted", connection);

    let mut driver = SessionDriver::new(state, handle);
    let mut send_task = pusher_loop(rx, sender);
    let mut pusher_finished = false;

    loop {
        let inbound = tokio::select! {
            // our side closed the connection (displaced, shutdown) or the peer stopped reading
            _ = &mut send_task => {
                pusher_finished = true;
                break;
            }
            // covers connections that never joined and so are not in the registry
            _ = async {
                let _ = shutdown_rx.wait_for(|stopping| *stopping).await;
            } => Inbound::Shutdown,
            inbound = next_inbound(&mut receiver, idle_timeout) => inbound,
        };

        let flow = match inbound {
            Inbound::Frame(Message::Text(text)) => driver.on_text(text.as_str()).await,
            Inbound::Frame(Message::Binary(_)) => driver.on_binary().await,
            Inbound::Frame(Message::Close(_)) => {
                tracing::info!("Connection {} requested close", connection);
                Flow::Close
            }
            // ping/pong is handled automatically by the WebSocket protocol
            Inbound::Frame(_) => Flow::Continue,
            Inbound::Idle => {
                tracing::info!("Connection {} idle for too long, closing", connection);
                Flow::Close
            }
            Inbound::Shutdown => {
                tracing::info!("Server shutting down, closing connection {}", connection);
                Flow::Close
            }
            Inbound::Ended => {
                tracing::info!("Connection {} disconnected", connection);
                Flow::Close
            }
        };

        if flow == Flow::Close {
            break;
        }
    }

    driver.teardown().await;

    if !pusher_finished {
        let abort = send_task.abort_handle();
        if tokio::time::timeout(FLUSH_TIMEOUT, send_task).await.is_err() {
            abort.abort();
        }
    }
    tracing::info!("Connection {} closed", connection);
}
