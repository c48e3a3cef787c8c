//! Real-time connection and its handshake state machine.
//!
//! ```text
//! Connecting ──► Authenticating ──► Authenticated ──► Closed
//!                       │
//!                       └──────────► Rejected ──────► Closed
//! ```

use std::collections::BTreeSet;

use super::{
    entity::Identity,
    error::{AuthError, ConnectionError},
    value_object::{ConnectionId, RoomId},
};

const BEARER_PREFIX: &str = "Bearer ";

/// Credential-bearing fields of the WebSocket handshake
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Handshake {
    /// `auth.token` (sent as the `token` query parameter)
    pub auth_token: Option<String>,
    /// `Authorization` header value
    pub authorization: Option<String>,
}

/// Extract the bearer credential from a handshake.
///
/// `auth_token` wins over `authorization`; empty values count as absent.
/// A `Bearer ` prefix is stripped from whichever value is used.
pub fn extract_credential(handshake: &Handshake) -> Option<String> {
    let raw = [&handshake.auth_token, &handshake.authorization]
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())?;

    Some(raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw).to_string())
}

/// Connection lifecycle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Authenticating,
    Authenticated,
    Rejected(AuthError),
    Closed,
}

impl ConnectionState {
    fn name(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Authenticating => "authenticating",
            Self::Authenticated => "authenticated",
            Self::Rejected(_) => "rejected",
            Self::Closed => "closed",
        }
    }
}

/// One real-time client session, owned by the task serving its socket.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    state: ConnectionState,
    identity: Option<Identity>,
    rooms: BTreeSet<RoomId>,
}

impl Connection {
    pub fn new() -> Self {
        Self::with_id(ConnectionId::generate())
    }

    pub fn with_id(id: ConnectionId) -> Self {
        Self {
            id,
            state: ConnectionState::Connecting,
            identity: None,
            rooms: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn rooms(&self) -> &BTreeSet<RoomId> {
        &self.rooms
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, ConnectionState::Closed)
    }

    /// Connecting → Authenticating
    pub fn begin_authentication(&mut self) -> Result<(), ConnectionError> {
        self.transition(
            matches!(self.state, ConnectionState::Connecting),
            ConnectionState::Authenticating,
        )
    }

    /// Authenticating → Authenticated, attaching the identity and its rooms
    pub fn authenticate(
        &mut self,
        identity: Identity,
        rooms: BTreeSet<RoomId>,
    ) -> Result<(), ConnectionError> {
        self.transition(
            matches!(self.state, ConnectionState::Authenticating),
            ConnectionState::Authenticated,
        )?;
        self.identity = Some(identity);
        self.rooms = rooms;
        Ok(())
    }

    /// Connecting | Authenticating → Rejected
    pub fn reject(&mut self, reason: AuthError) -> Result<(), ConnectionError> {
        self.transition(
            matches!(
                self.state,
                ConnectionState::Connecting | ConnectionState::Authenticating
            ),
            ConnectionState::Rejected(reason),
        )
    }

    /// Any state → Closed. Returns the rooms the connection was in.
    pub fn close(&mut self) -> BTreeSet<RoomId> {
        self.state = ConnectionState::Closed;
        std::mem::take(&mut self.rooms)
    }

    fn transition(&mut self, allowed: bool, next: ConnectionState) -> Result<(), ConnectionError> {
        if !allowed {
            return Err(ConnectionError::InvalidTransition {
                from: self.state.name(),
                to: next.name(),
            });
        }
        self.state = next;
        Ok(())
    }
}

impl Default for Connection {
    fn default() -> Self {
        Self::new()
    }
}
