//! Notifier that records notices as structured log events.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{Notifier, NotifierError};

/// Notifier used when no webhook topic is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, subject: &str, message: &str) -> Result<(), NotifierError> {
        info!(target: "bloodbridge::notifications", subject, message, "notification");
        Ok(())
    }
}
