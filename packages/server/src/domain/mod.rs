//! Domain layer of the relay.
//!
//! Pure types (value objects, entities, the per-connection session state machine) and
//! the interfaces that the infrastructure layer implements (dependency inversion).

pub mod connection;
pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod registry;
pub mod session;
pub mod value_object;

pub use connection::{ConnectionHandle, OutboundFrame};
pub use entity::{Afterimage, PlayerEntry, PlayerState, RosterEntry, StateFields};
pub use error::{MessagePushError, RegistryError, ValueObjectError};
pub use message_pusher::MessagePusher;
pub use registry::{BroadcastTarget, ConnectionRegistry, Snapshot};
pub use session::{ClientSession, MalformedVerdict, SessionPhase};
pub use value_object::{ConnectionId, Nickname, Timestamp};
