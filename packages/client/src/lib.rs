//! Headless command-line client for the Courtyard relay.
//!
//! Joins under a nickname, keeps the connection alive with periodic pings, turns
//! typed commands into `update` / `action` messages, and prints the roster the
//! server broadcasts.

pub mod command;
pub mod error;
pub mod formatter;
pub mod player;
pub mod runner;
pub mod session;
pub mod ui;

pub use runner::{ClientOptions, run_client};
