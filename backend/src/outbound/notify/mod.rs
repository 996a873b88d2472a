//! Notifier adapters.
//!
//! - **log**: writes every notice to the `tracing` pipeline.
//! - **webhook**: posts notices as JSON to an HTTP topic endpoint.

mod log_notifier;
mod webhook_notifier;

pub use log_notifier::LogNotifier;
pub use webhook_notifier::WebhookNotifier;
