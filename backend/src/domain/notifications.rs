//! Notification messages and best-effort delivery.
//!
//! Notifications never affect the outcome of the operation that raised them:
//! delivery failures are logged and dropped.

use tracing::{debug, warn};

use crate::domain::ports::Notifier;
use crate::domain::{BloodType, Username};

/// Subject and body of an outbound notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub subject: String,
    pub message: String,
}

impl Notice {
    fn new(subject: &str, message: String) -> Self {
        Self {
            subject: subject.to_owned(),
            message,
        }
    }

    pub fn user_signup(username: &Username) -> Self {
        Self::new(
            "New User Signup",
            format!("User {username} has joined BloodBridge."),
        )
    }

    pub fn user_login(username: &Username) -> Self {
        Self::new("Login Alert", format!("User {username} logged in."))
    }

    pub fn admin_signup(username: &Username) -> Self {
        Self::new("Admin Signup", format!("New Admin created: {username}"))
    }

    pub fn new_request(blood_type: BloodType, requester: &Username) -> Self {
        Self::new(
            "New Request",
            format!("Blood Type {blood_type} requested by {requester}."),
        )
    }

    /// Alert listing every low blood type, or `None` when stock is healthy.
    pub fn low_stock(low: &[BloodType]) -> Option<Self> {
        if low.is_empty() {
            return None;
        }
        let labels: Vec<&str> = low.iter().map(|bt| bt.label()).collect();
        Some(Self::new(
            "Low Blood Stock Alert",
            format!("Critical levels detected: {}", labels.join(", ")),
        ))
    }
}

/// Deliver `notice`, logging rather than propagating failures.
pub async fn notify_best_effort(notifier: &dyn Notifier, notice: Notice) {
    match notifier.notify(&notice.subject, &notice.message).await {
        Ok(()) => debug!(subject = %notice.subject, "notification delivered"),
        Err(error) => warn!(
            subject = %notice.subject,
            error = %error,
            "notification delivery failed"
        ),
    }
}
