//! Domain layer: connection handles, roles, payload types, and the registry.
//!
//! This module contains the relay's data model: connection identity and
//! liveness, the peer roles and their announcement markers, the status and
//! command payloads, the notifications sent to monitors, and the registry
//! that binds roles to live connections.

pub mod conn_id;
pub mod connection;
pub mod registry;
pub mod relay_event;
pub mod role;
pub mod status;

pub use conn_id::ConnectionId;
pub use connection::ConnHandle;
pub use registry::{ConnectionRegistry, RegistrySnapshot};
pub use relay_event::{CommandKind, RelayEvent};
pub use role::{PeerRole, Role};
pub use status::{StatusFlags, StructuredStatus};
