//! Utilities shared between the Courtyard relay server and its CLI client.

pub mod logger;
pub mod time;
