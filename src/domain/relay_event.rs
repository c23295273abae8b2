//! Notifications pushed to monitor connections.
//!
//! Every [`RelayEvent`] is serialized as a JSON object tagged by `type`
//! and broadcast to the open monitors. Raw device status strings are
//! forwarded as-is and never wrapped in an event.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{PeerRole, StructuredStatus};

/// Recognised kinds of structured actuator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// Drive the vibration motor.
    Vibration,
    /// Drive the buzzer.
    Buzzer,
}

impl CommandKind {
    /// Parses the `type` field of a structured command.
    #[must_use]
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "vibration" => Some(Self::Vibration),
            "buzzer" => Some(Self::Buzzer),
            _ => None,
        }
    }

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vibration => "vibration",
            Self::Buzzer => "buzzer",
        }
    }
}

/// Monitor-bound notification.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayEvent {
    /// A connection claimed a peer role.
    PeerConnected {
        /// Role that was bound.
        role: PeerRole,
        /// Binding time.
        timestamp: DateTime<Utc>,
    },

    /// The connection holding a peer role went away.
    PeerDisconnected {
        /// Role that was cleared.
        role: PeerRole,
        /// Disconnect time.
        timestamp: DateTime<Utc>,
    },

    /// Decoded `battery,safety,lock,trigger` report.
    StatusUpdate {
        /// Battery level digit.
        battery: u8,
        /// Safety switch digit.
        safety: u8,
        /// Lock state digit.
        lock: u8,
        /// Trigger state digit.
        trigger: u8,
        /// Receive time.
        timestamp: DateTime<Utc>,
    },

    /// A structured command reached the actuator queue.
    CommandSent {
        /// Command kind that was forwarded.
        command: CommandKind,
        /// Forward time.
        timestamp: DateTime<Utc>,
    },

    /// A structured command was dropped because no actuator is connected.
    ActuatorNotConnected {
        /// Command kind that was dropped.
        command: CommandKind,
        /// Drop time.
        timestamp: DateTime<Utc>,
    },
}

impl RelayEvent {
    /// Builds a [`RelayEvent::StatusUpdate`] stamped with the current time.
    #[must_use]
    pub fn status_update(status: StructuredStatus) -> Self {
        Self::StatusUpdate {
            battery: status.battery,
            safety: status.safety,
            lock: status.lock,
            trigger: status.trigger,
            timestamp: Utc::now(),
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::PeerConnected { .. } => "peer_connected",
            Self::PeerDisconnected { .. } => "peer_disconnected",
            Self::StatusUpdate { .. } => "status_update",
            Self::CommandSent { .. } => "command_sent",
            Self::ActuatorNotConnected { .. } => "actuator_not_connected",
        }
    }

    /// Serializes the event to its wire form.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
