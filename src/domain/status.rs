//! Status payloads reported by the device.

use std::fmt;

use serde::Serialize;

/// 16-bit flag vector; bit `i` is the boolean flag `BITi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct StatusFlags(u16);

impl StatusFlags {
    /// Wraps a raw flag vector.
    #[must_use]
    pub const fn new(bits: u16) -> Self {
        Self(bits)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// Returns `true` if flag `bit` is set. Bits above 15 are never set.
    #[must_use]
    pub const fn is_set(&self, bit: u8) -> bool {
        bit < 16 && self.0 & (1 << bit) != 0
    }

    /// Indices of the set flags in ascending order.
    #[must_use]
    pub fn active_bits(&self) -> Vec<u8> {
        (0..16).filter(|bit| self.is_set(*bit)).collect()
    }
}

impl fmt::Display for StatusFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let active = self.active_bits();
        if active.is_empty() {
            return f.write_str("none");
        }
        for (i, bit) in active.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "BIT{bit}")?;
        }
        Ok(())
    }
}

/// Four single-digit readings sent as `battery,safety,lock,trigger`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StructuredStatus {
    /// Battery level digit.
    pub battery: u8,
    /// Safety switch digit.
    pub safety: u8,
    /// Lock state digit.
    pub lock: u8,
    /// Trigger state digit.
    pub trigger: u8,
}

impl StructuredStatus {
    /// Parses the exact literal `d,d,d,d`. Any other shape returns `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let mut fields = raw.split(',').map(single_digit);
        let battery = fields.next()??;
        let safety = fields.next()??;
        let lock = fields.next()??;
        let trigger = fields.next()??;
        if fields.next().is_some() {
            return None;
        }
        Some(Self {
            battery,
            safety,
            lock,
            trigger,
        })
    }
}

/// Parses a field made of exactly one ASCII digit.
fn single_digit(field: &str) -> Option<u8> {
    match field.as_bytes() {
        [b] if b.is_ascii_digit() => Some(b - b'0'),
        _ => None,
    }
}
