//! Data Transfer Objects for the WebSocket protocol and the HTTP API.

pub mod conversion;
pub mod http;
pub mod websocket;
