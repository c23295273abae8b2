//! # haptic-relay
//!
//! WebSocket relay connecting a status-reporting device, a haptic actuator,
//! and any number of monitoring clients, with a read-only status page.
//!
//! Peers share one endpoint and identify themselves by announcing a role.
//! Status reports flow from the device to every monitor; commands flow from
//! monitors to the actuator. Delivery is best-effort: nothing is queued for
//! a peer that is not connected.
//!
//! ## Architecture
//!
//! ```text
//! Peers (WebSocket on /)        Browsers (HTTP)
//!     │                              │
//!     ├── WS Connection (ws/)        ├── Pages (api/)
//!     │                              │
//!     ├── RelayHub (service/) ───────┘
//!     │     ├── classify
//!     │     └── route
//!     │
//!     └── ConnectionRegistry (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;
