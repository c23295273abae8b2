//! Relay hub: the single owner of the connection registry.
//!
//! Every inbound payload runs classify → route → deliver. Routing and
//! delivery share one lock acquisition, so a lookup of the actuator and
//! the actuator's disconnect can never interleave.

use tokio::sync::{Mutex, mpsc};

use super::classifier::{Classified, classify};
use super::router::{self, Delivery};
use crate::domain::{ConnHandle, ConnectionRegistry, RegistrySnapshot};

/// Shared relay state, one per process.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
#[derive(Debug)]
pub struct RelayHub {
    registry: Mutex<ConnectionRegistry>,
    outbound_capacity: usize,
}

impl RelayHub {
    /// Creates an empty hub whose connections buffer up to
    /// `outbound_capacity` pending payloads each.
    #[must_use]
    pub fn new(outbound_capacity: usize) -> Self {
        Self {
            registry: Mutex::new(ConnectionRegistry::new()),
            outbound_capacity,
        }
    }

    /// Registers a new connection and returns its handle together with the
    /// queue the transport must drain into the socket.
    ///
    /// The connection holds no role until it announces one.
    #[must_use]
    pub fn connect(&self) -> (ConnHandle, mpsc::Receiver<String>) {
        let (handle, rx) = ConnHandle::new(self.outbound_capacity);
        tracing::debug!(conn_id = %handle.id(), "connection registered");
        (handle, rx)
    }

    /// Handles one text payload received on `origin`.
    ///
    /// Returns the number of payloads that were enqueued for delivery.
    /// Payloads from a connection that is already closed are ignored.
    pub async fn handle_text(&self, origin: &ConnHandle, raw: &str) -> usize {
        if !origin.is_open() {
            return 0;
        }

        let message = classify(raw);
        match &message {
            Classified::Unrecognized => {
                tracing::debug!(conn_id = %origin.id(), payload = raw, "unrecognized payload");
                return 0;
            }
            Classified::Discarded => {
                tracing::debug!(conn_id = %origin.id(), payload = raw, "numeric status out of range");
                return 0;
            }
            Classified::NumericStatus { flags, .. } => {
                tracing::debug!(
                    conn_id = %origin.id(),
                    value = flags.bits(),
                    active = %flags,
                    "numeric status"
                );
            }
            other => {
                tracing::debug!(conn_id = %origin.id(), category = other.category(), "payload classified");
            }
        }

        let mut registry = self.registry.lock().await;
        let deliveries = router::route(&mut registry, origin, message);
        deliver(deliveries)
    }

    /// Tears down `conn`: clears the roles it still holds, leaves the
    /// monitor set, and tells the monitors which roles went away.
    ///
    /// Returns `false` if the connection was already closed, in which case
    /// nothing happens.
    pub async fn disconnect(&self, conn: &ConnHandle) -> bool {
        if !conn.close() {
            return false;
        }

        let mut registry = self.registry.lock().await;
        let deliveries = router::route_disconnect(&mut registry, conn);
        let notified = deliver(deliveries);
        tracing::debug!(conn_id = %conn.id(), notified, "connection closed");
        true
    }

    /// Returns the current registry view for diagnostics.
    pub async fn snapshot(&self) -> RegistrySnapshot {
        self.registry.lock().await.snapshot()
    }
}

impl Default for RelayHub {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Sends every delivery, counting the ones that were enqueued.
fn deliver(deliveries: Vec<Delivery>) -> usize {
    let mut sent = 0;
    for Delivery { to, payload } in deliveries {
        if to.send(payload) {
            sent += 1;
        }
    }
    sent
}
