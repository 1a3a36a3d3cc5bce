//! Request handlers.

pub mod http;
pub mod session;
pub mod websocket;

pub use http::{devtools_probe, get_players, health_check};
pub use websocket::websocket_handler;
