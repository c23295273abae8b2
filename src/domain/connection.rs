//! Cloneable handle to one live WebSocket connection.
//!
//! The socket itself is owned by the transport task in [`crate::ws`]. The
//! registry only stores [`ConnHandle`] clones, which can enqueue outbound
//! payloads and observe the shared liveness flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::ConnectionId;

/// Handle used by the router to address a connection.
///
/// Equality is identity: two handles are equal when they refer to the same
/// underlying connection, regardless of any payload seen on it.
#[derive(Debug, Clone)]
pub struct ConnHandle {
    id: ConnectionId,
    tx: mpsc::Sender<String>,
    open: Arc<AtomicBool>,
}

impl ConnHandle {
    /// Creates a handle and the receiving end of its outbound queue.
    ///
    /// `capacity` bounds the number of payloads waiting to be written to the
    /// socket; a zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = Self {
            id: ConnectionId::new(),
            tx,
            open: Arc::new(AtomicBool::new(true)),
        };
        (handle, rx)
    }

    /// Returns the connection identifier.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// Returns `true` while the connection has not been closed and its
    /// writer is still draining the outbound queue.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire) && !self.tx.is_closed()
    }

    /// Enqueues `payload` for delivery without waiting.
    ///
    /// Liveness is checked immediately before the send. Returns `false` when
    /// the connection is closed or its queue is full; the payload is dropped
    /// in both cases.
    pub fn send(&self, payload: String) -> bool {
        if !self.is_open() {
            tracing::debug!(conn_id = %self.id, "skipping send to closed connection");
            return false;
        }
        match self.tx.try_send(payload) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "outbound queue full, payload dropped");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    /// Marks the connection closed.
    ///
    /// Returns `true` only for the call that performed the transition; every
    /// later call is a no-op returning `false`.
    pub fn close(&self) -> bool {
        self.open.swap(false, Ordering::AcqRel)
    }
}

impl PartialEq for ConnHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ConnHandle {}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_handle_is_open() {
        let (handle, _rx) = ConnHandle::new(4);
        assert!(handle.is_open());
    }

    #[test]
    fn send_enqueues_payload() {
        let (handle, mut rx) = ConnHandle::new(4);
        assert!(handle.send("34".to_string()));
        assert_eq!(rx.try_recv().ok().as_deref(), Some("34"));
    }

    #[test]
    fn send_after_close_is_dropped() {
        let (handle, mut rx) = ConnHandle::new(4);
        assert!(handle.close());
        assert!(!handle.is_open());
        assert!(!handle.send("CLS".to_string()));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn close_is_idempotent() {
        let (handle, _rx) = ConnHandle::new(4);
        assert!(handle.close());
        assert!(!handle.close());
        assert!(!handle.clone().close());
    }

    #[test]
    fn dropped_receiver_means_not_open() {
        let (handle, rx) = ConnHandle::new(4);
        drop(rx);
        assert!(!handle.is_open());
        assert!(!handle.send("1".to_string()));
    }

    #[test]
    fn full_queue_drops_payload() {
        let (handle, mut rx) = ConnHandle::new(1);
        assert!(handle.send("a".to_string()));
        assert!(!handle.send("b".to_string()));
        assert_eq!(rx.try_recv().ok().as_deref(), Some("a"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn equality_is_identity() {
        let (a, _rx_a) = ConnHandle::new(1);
        let (b, _rx_b) = ConnHandle::new(1);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
