//! Connection lifecycle events consumed by the manager.

use sponsors_core::types::UserId;

/// Session lifecycle event produced by the network layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// A user is connecting.
    Connecting(UserId),
    /// A user's connection was closed.
    Disconnected(UserId),
}

impl ConnectionEvent {
    /// Returns the user the event is about.
    pub fn user_id(&self) -> UserId {
        match self {
            ConnectionEvent::Connecting(id) | ConnectionEvent::Disconnected(id) => *id,
        }
    }
}
