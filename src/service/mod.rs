//! Service layer: classification, routing policy, and the relay hub.
//!
//! [`RelayHub`] owns the [`crate::domain::ConnectionRegistry`] and runs
//! every inbound payload through [`classifier::classify`] and
//! [`router::route`] before delivering the results.

pub mod classifier;
pub mod relay_hub;
pub mod router;

pub use classifier::{Classified, classify};
pub use relay_hub::RelayHub;
pub use router::Delivery;
