//! Multiplayer state relay for a 2D browser game.
//!
//! Clients join under a nickname, stream their player state, and every accepted
//! update is answered with the full roster sent to every joined connection.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
