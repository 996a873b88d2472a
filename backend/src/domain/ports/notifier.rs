//! Driven port for outbound notifications.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised while delivering a notification.
    pub enum NotifierError {
        /// Transport failure or timeout.
        Delivery { message: String } => "notification delivery failed: {message}",
        /// The topic answered with a non-success status.
        Rejected { status: u16, message: String } => "notification rejected with status {status}: {message}",
    }
}

/// Publishes a subject/message pair to operators.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, subject: &str, message: &str) -> Result<(), NotifierError>;
}

/// Notifier that drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNotifier;

#[async_trait]
impl Notifier for NoOpNotifier {
    async fn notify(&self, _subject: &str, _message: &str) -> Result<(), NotifierError> {
        Ok(())
    }
}
