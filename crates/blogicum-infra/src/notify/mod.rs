//! Notification sinks.
//!
//! Delivery failures are reported to the caller, which logs and drops them.

mod log;
#[cfg(feature = "webhook")]
mod webhook;

pub use log::LogNotifier;
#[cfg(feature = "webhook")]
pub use webhook::{WebhookConfig, WebhookNotifier};
