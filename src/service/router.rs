//! Routing policy: who receives what for each classified payload.
//!
//! The router is synchronous and performs no I/O. It reads and updates
//! the [`ConnectionRegistry`] and returns the [`Delivery`] list that the
//! hub then sends while still holding the registry lock.

use chrono::Utc;

use super::classifier::Classified;
use crate::domain::{ConnHandle, ConnectionRegistry, PeerRole, RelayEvent, Role};

/// Payload sent back to a connection that announces itself as a monitor.
pub const MONITOR_WELCOME: &str = "web_monitor";

/// One outbound payload addressed to one connection.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Destination connection.
    pub to: ConnHandle,
    /// Text frame to send.
    pub payload: String,
}

impl Delivery {
    fn new(to: &ConnHandle, payload: impl Into<String>) -> Self {
        Self {
            to: to.clone(),
            payload: payload.into(),
        }
    }
}

/// Decides the deliveries for one inbound message from `origin`.
///
/// Exactly one policy branch runs per message. Monitors whose connection is
/// no longer open are skipped. A missing or closed actuator makes command
/// forwarding a silent drop, except for structured commands which report
/// the failure to the monitors.
pub fn route(
    registry: &mut ConnectionRegistry,
    origin: &ConnHandle,
    message: Classified,
) -> Vec<Delivery> {
    match message {
        Classified::RoleAnnounce(Role::Peer(role)) => {
            registry.bind_role(role, origin);
            tracing::info!(conn_id = %origin.id(), %role, "peer role bound");
            broadcast_event(
                registry,
                &RelayEvent::PeerConnected {
                    role,
                    timestamp: Utc::now(),
                },
            )
        }
        Classified::RoleAnnounce(Role::Monitor) => {
            let rejoined = registry.is_monitor(origin);
            registry.add_monitor(origin);
            tracing::info!(
                conn_id = %origin.id(),
                rejoined,
                monitors = registry.monitor_count(),
                "monitor joined"
            );
            vec![Delivery::new(origin, MONITOR_WELCOME)]
        }
        Classified::Command(raw) => to_actuator(registry, raw),
        Classified::NumericStatus { raw, .. } => {
            if is_reporting_peer(registry, origin) {
                broadcast(registry, &raw)
            } else {
                to_actuator(registry, raw)
            }
        }
        Classified::StructuredStatus(status) => {
            registry.bind_role(PeerRole::Device, origin);
            broadcast_event(registry, &RelayEvent::status_update(status))
        }
        Classified::StructuredCommand { kind, payload } => {
            let Some(actuator) = registry.resolve_open(PeerRole::Actuator) else {
                tracing::info!(command = kind.as_str(), "actuator not connected");
                return broadcast_event(
                    registry,
                    &RelayEvent::ActuatorNotConnected {
                        command: kind,
                        timestamp: Utc::now(),
                    },
                );
            };
            let mut deliveries = vec![Delivery::new(actuator, payload.to_string())];
            deliveries.extend(broadcast_event(
                registry,
                &RelayEvent::CommandSent {
                    command: kind,
                    timestamp: Utc::now(),
                },
            ));
            deliveries
        }
        Classified::Discarded | Classified::Unrecognized => Vec::new(),
    }
}

/// Clears everything `conn` held and notifies monitors of lost roles.
///
/// Bindings are only cleared where `conn` is still the current holder, so
/// a late close from a replaced connection produces no notification.
pub fn route_disconnect(registry: &mut ConnectionRegistry, conn: &ConnHandle) -> Vec<Delivery> {
    registry.remove_monitor(conn);

    let mut deliveries = Vec::new();
    for role in registry.roles_held_by(conn) {
        if registry.unbind_if_current(role, conn) {
            tracing::info!(conn_id = %conn.id(), %role, "peer role released");
            deliveries.extend(broadcast_event(
                registry,
                &RelayEvent::PeerDisconnected {
                    role,
                    timestamp: Utc::now(),
                },
            ));
        }
    }
    deliveries
}

/// Numeric payloads from a bound peer are status reports; from anyone
/// else they are commands.
fn is_reporting_peer(registry: &ConnectionRegistry, origin: &ConnHandle) -> bool {
    registry.holds(PeerRole::Device, origin) || registry.holds(PeerRole::Actuator, origin)
}

fn to_actuator(registry: &ConnectionRegistry, payload: String) -> Vec<Delivery> {
    match registry.resolve_open(PeerRole::Actuator) {
        Some(actuator) => vec![Delivery::new(actuator, payload)],
        None => {
            tracing::debug!(payload = %payload, "no actuator connected, command dropped");
            Vec::new()
        }
    }
}

fn broadcast(registry: &ConnectionRegistry, payload: &str) -> Vec<Delivery> {
    registry
        .open_monitors()
        .map(|monitor| Delivery::new(monitor, payload))
        .collect()
}

fn broadcast_event(registry: &ConnectionRegistry, event: &RelayEvent) -> Vec<Delivery> {
    let deliveries = broadcast(registry, &event.to_json());
    tracing::debug!(
        event = event.event_type_str(),
        monitors = deliveries.len(),
        "notifying monitors"
    );
    deliveries
}
