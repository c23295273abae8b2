//! Role bindings and the monitor set.
//!
//! [`ConnectionRegistry`] is plain data with O(1) operations. It is not
//! synchronized itself; [`crate::service::RelayHub`] keeps the single
//! instance behind a mutex so that a lookup and the sends that depend on
//! it happen under one lock acquisition.

use std::collections::HashMap;

use serde::Serialize;

use super::{ConnHandle, ConnectionId, PeerRole};

/// Tracks which connection holds each [`PeerRole`] and which connections
/// are monitors.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    device: Option<ConnHandle>,
    actuator: Option<ConnHandle>,
    monitors: HashMap<ConnectionId, ConnHandle>,
}

/// Point-in-time view of the registry for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistrySnapshot {
    /// Whether an open connection holds the device role.
    pub device_bound: bool,
    /// Whether an open connection holds the actuator role.
    pub actuator_bound: bool,
    /// Number of open monitor connections.
    pub monitors: usize,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, role: PeerRole) -> &mut Option<ConnHandle> {
        match role {
            PeerRole::Device => &mut self.device,
            PeerRole::Actuator => &mut self.actuator,
        }
    }

    /// Binds `role` to `conn`, silently replacing any previous binding.
    pub fn bind_role(&mut self, role: PeerRole, conn: &ConnHandle) {
        *self.slot(role) = Some(conn.clone());
    }

    /// Clears the binding for `role` only if it is currently `conn`.
    ///
    /// Returns `true` if a binding was cleared. A close arriving from a
    /// connection that has since been replaced leaves the newer binding
    /// untouched.
    pub fn unbind_if_current(&mut self, role: PeerRole, conn: &ConnHandle) -> bool {
        let slot = self.slot(role);
        if slot.as_ref() == Some(conn) {
            *slot = None;
            true
        } else {
            false
        }
    }

    /// Returns the connection bound to `role`, if any.
    #[must_use]
    pub fn resolve(&self, role: PeerRole) -> Option<&ConnHandle> {
        match role {
            PeerRole::Device => self.device.as_ref(),
            PeerRole::Actuator => self.actuator.as_ref(),
        }
    }

    /// Returns the connection bound to `role` only if it is still open.
    #[must_use]
    pub fn resolve_open(&self, role: PeerRole) -> Option<&ConnHandle> {
        self.resolve(role).filter(|conn| self.is_open(conn))
    }

    /// Returns `true` if `conn` currently holds `role`.
    #[must_use]
    pub fn holds(&self, role: PeerRole, conn: &ConnHandle) -> bool {
        self.resolve(role) == Some(conn)
    }

    /// Roles currently held by `conn`.
    #[must_use]
    pub fn roles_held_by(&self, conn: &ConnHandle) -> Vec<PeerRole> {
        PeerRole::ALL
            .into_iter()
            .filter(|role| self.holds(*role, conn))
            .collect()
    }

    /// Adds `conn` to the monitor set. Adding twice keeps one entry.
    pub fn add_monitor(&mut self, conn: &ConnHandle) {
        self.monitors.insert(conn.id(), conn.clone());
    }

    /// Removes `conn` from the monitor set; a no-op if absent.
    pub fn remove_monitor(&mut self, conn: &ConnHandle) -> bool {
        self.monitors.remove(&conn.id()).is_some()
    }

    /// Returns `true` if `conn` is in the monitor set.
    #[must_use]
    pub fn is_monitor(&self, conn: &ConnHandle) -> bool {
        self.monitors.contains_key(&conn.id())
    }

    /// Iterates over monitors whose connection is still open.
    pub fn open_monitors(&self) -> impl Iterator<Item = &ConnHandle> {
        self.monitors.values().filter(|conn| conn.is_open())
    }

    /// Number of monitors in the set, open or not.
    #[must_use]
    pub fn monitor_count(&self) -> usize {
        self.monitors.len()
    }

    /// Transport-reported liveness of `conn`.
    #[must_use]
    pub fn is_open(&self, conn: &ConnHandle) -> bool {
        conn.is_open()
    }

    /// Captures the current bindings for the diagnostic page.
    #[must_use]
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            device_bound: self.resolve_open(PeerRole::Device).is_some(),
            actuator_bound: self.resolve_open(PeerRole::Actuator).is_some(),
            monitors: self.open_monitors().count(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    /// Handle whose receiver is already dropped, so it reports closed.
    fn dead_conn() -> ConnHandle {
        ConnHandle::new(4).0
    }

    #[test]
    fn rebind_overwrites_previous() {
        let mut registry = ConnectionRegistry::new();
        let (c1, _rx1) = ConnHandle::new(4);
        let (c2, _rx2) = ConnHandle::new(4);
        for role in PeerRole::ALL {
            registry.bind_role(role, &c1);
            registry.bind_role(role, &c2);
            assert_eq!(registry.resolve(role), Some(&c2));
        }
    }

    #[test]
    fn bind_is_idempotent() {
        let mut registry = ConnectionRegistry::new();
        let (c1, _rx) = ConnHandle::new(4);
        registry.bind_role(PeerRole::Device, &c1);
        registry.bind_role(PeerRole::Device, &c1);
        assert_eq!(registry.resolve(PeerRole::Device), Some(&c1));
    }

    #[test]
    fn stale_unbind_keeps_new_binding() {
        let mut registry = ConnectionRegistry::new();
        let (old, _rx_old) = ConnHandle::new(4);
        let (new, _rx_new) = ConnHandle::new(4);
        registry.bind_role(PeerRole::Actuator, &old);
        registry.bind_role(PeerRole::Actuator, &new);

        assert!(!registry.unbind_if_current(PeerRole::Actuator, &old));
        assert_eq!(registry.resolve(PeerRole::Actuator), Some(&new));

        assert!(registry.unbind_if_current(PeerRole::Actuator, &new));
        assert_eq!(registry.resolve(PeerRole::Actuator), None);
    }

    #[test]
    fn roles_are_independent() {
        let mut registry = ConnectionRegistry::new();
        let (c1, _rx) = ConnHandle::new(4);
        registry.bind_role(PeerRole::Device, &c1);
        assert_eq!(registry.resolve(PeerRole::Actuator), None);
        assert!(!registry.unbind_if_current(PeerRole::Actuator, &c1));
        assert_eq!(registry.roles_held_by(&c1), vec![PeerRole::Device]);
    }

    #[test]
    fn monitor_set_semantics() {
        let mut registry = ConnectionRegistry::new();
        let (m, _rx) = ConnHandle::new(4);
        registry.add_monitor(&m);
        registry.add_monitor(&m);
        assert_eq!(registry.monitor_count(), 1);
        assert!(registry.is_monitor(&m));
        assert!(registry.remove_monitor(&m));
        assert!(!registry.remove_monitor(&m));
        assert_eq!(registry.monitor_count(), 0);
    }

    #[test]
    fn closed_monitors_are_skipped_but_kept() {
        let mut registry = ConnectionRegistry::new();
        let (open, _rx_open) = ConnHandle::new(4);
        let (closed, _rx_closed) = ConnHandle::new(4);
        registry.add_monitor(&open);
        registry.add_monitor(&closed);
        closed.close();

        let live: Vec<_> = registry.open_monitors().collect();
        assert_eq!(live, vec![&open]);
        assert_eq!(registry.monitor_count(), 2);
    }

    #[test]
    fn resolve_open_filters_dead_binding() {
        let mut registry = ConnectionRegistry::new();
        let dead = dead_conn();
        registry.bind_role(PeerRole::Actuator, &dead);
        assert!(registry.resolve(PeerRole::Actuator).is_some());
        assert!(registry.resolve_open(PeerRole::Actuator).is_none());
        assert!(!registry.snapshot().actuator_bound);
    }

    #[test]
    fn snapshot_counts_live_state() {
        let mut registry = ConnectionRegistry::new();
        let (device, _rx_d) = ConnHandle::new(4);
        let (monitor, _rx_m) = ConnHandle::new(4);
        registry.bind_role(PeerRole::Device, &device);
        registry.add_monitor(&monitor);
        assert_eq!(
            registry.snapshot(),
            RegistrySnapshot {
                device_bound: true,
                actuator_bound: false,
                monitors: 1,
            }
        );
    }
}
