//! メッセージ送信（通知）の実装
//!
//! - `websocket`: 接続ごとの pusher ループ（WebSocket）へチャンネル経由で送る実装

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
