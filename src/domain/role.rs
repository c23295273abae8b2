//! Peer roles and their announcement markers.

use std::fmt;

use serde::Serialize;

/// A role that is bound to at most one connection at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerRole {
    /// Hardware device reporting its flag vector.
    Device,
    /// Haptic actuator receiving commands.
    Actuator,
}

impl PeerRole {
    /// Every bindable role, in a stable order.
    pub const ALL: [Self; 2] = [Self::Device, Self::Actuator];

    /// Returns the role name as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Device => "device",
            Self::Actuator => "actuator",
        }
    }
}

impl fmt::Display for PeerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any role a connection can announce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// One of the singly-bound peer roles.
    Peer(PeerRole),
    /// A monitoring client; any number may be connected.
    Monitor,
}

impl Role {
    /// Announcement markers, checked in this order against the payload.
    pub const MARKERS: [(&'static str, Self); 3] = [
        ("sensor_device", Self::Peer(PeerRole::Device)),
        ("vibrator_device", Self::Peer(PeerRole::Actuator)),
        ("web_monitor", Self::Monitor),
    ];

    /// Returns the role announced by `payload`, if it contains a marker.
    #[must_use]
    pub fn from_announcement(payload: &str) -> Option<Self> {
        Self::MARKERS
            .iter()
            .find(|(marker, _)| payload.contains(marker))
            .map(|(_, role)| *role)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Peer(peer) => fmt::Display::fmt(peer, f),
            Self::Monitor => f.write_str("monitor"),
        }
    }
}
