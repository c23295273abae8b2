//! Inbound payload classification.
//!
//! [`classify`] maps a raw text frame to exactly one [`Classified`]
//! category. Rules are tried in a fixed order and the first match wins,
//! because the wire formats overlap: `"sensor_device"` is also valid
//! free text, `"3,1,0,1"` is made of digits, and so on.

use crate::domain::{CommandKind, Role, StatusFlags, StructuredStatus};

/// Prefixes of text commands that are forwarded verbatim to the actuator.
pub const COMMAND_PREFIXES: [&str; 2] = ["SET_", "BIT_"];

/// Literal text commands forwarded verbatim to the actuator.
pub const COMMAND_LITERALS: [&str; 1] = ["CLS"];

/// Result of classifying one inbound payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    /// The sender declared its role.
    RoleAnnounce(Role),
    /// Text command for the actuator, forwarded unchanged.
    Command(String),
    /// `battery,safety,lock,trigger` report.
    StructuredStatus(StructuredStatus),
    /// Decimal flag vector in `0..=65535`.
    NumericStatus {
        /// Parsed flags.
        flags: StatusFlags,
        /// Payload as received, forwarded without reformatting.
        raw: String,
    },
    /// JSON command object with a recognised `type`.
    StructuredCommand {
        /// Value of the `type` field.
        kind: CommandKind,
        /// The whole command object.
        payload: serde_json::Value,
    },
    /// All-digit payload outside `0..=65535`; dropped without routing.
    Discarded,
    /// Anything else; logged and never routed.
    Unrecognized,
}

impl Classified {
    /// Returns the category name for logging.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::RoleAnnounce(_) => "role_announce",
            Self::Command(_) => "command",
            Self::StructuredStatus(_) => "structured_status",
            Self::NumericStatus { .. } => "numeric_status",
            Self::StructuredCommand { .. } => "structured_command",
            Self::Discarded => "discarded",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// Classifies a raw payload. Never fails.
///
/// Rule order:
/// 1. role marker anywhere in the payload,
/// 2. `SET_`/`BIT_` prefix or the literal `CLS`,
/// 3. exactly `d,d,d,d`,
/// 4. all ASCII digits (out of range is [`Classified::Discarded`]),
/// 5. JSON object with a recognised `type`,
/// 6. everything else.
#[must_use]
pub fn classify(raw: &str) -> Classified {
    if let Some(role) = Role::from_announcement(raw) {
        return Classified::RoleAnnounce(role);
    }

    if is_command_token(raw) {
        return Classified::Command(raw.to_string());
    }

    if let Some(status) = StructuredStatus::parse(raw) {
        return Classified::StructuredStatus(status);
    }

    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        return match raw.parse::<u16>() {
            Ok(bits) => Classified::NumericStatus {
                flags: StatusFlags::new(bits),
                raw: raw.to_string(),
            },
            Err(_) => Classified::Discarded,
        };
    }

    if let Some((kind, payload)) = parse_structured_command(raw) {
        return Classified::StructuredCommand { kind, payload };
    }

    Classified::Unrecognized
}

fn is_command_token(raw: &str) -> bool {
    COMMAND_PREFIXES.iter().any(|prefix| raw.starts_with(prefix))
        || COMMAND_LITERALS.contains(&raw)
}

fn parse_structured_command(raw: &str) -> Option<(CommandKind, serde_json::Value)> {
    let payload = serde_json::from_str::<serde_json::Value>(raw).ok()?;
    let kind = payload
        .as_object()?
        .get("type")?
        .as_str()
        .and_then(CommandKind::parse)?;
    Some((kind, payload))
}
