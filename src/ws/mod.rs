//! WebSocket layer: upgrade and per-connection read/write loop.
//!
//! Every peer (device, actuator, monitor) uses the same endpoint and is
//! told apart only by the role it announces after connecting.

pub mod connection;
pub mod handler;
