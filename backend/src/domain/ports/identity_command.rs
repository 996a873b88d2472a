//! Driving port for signup and login.
//!
//! Inbound adapters call this port to register or authenticate an account
//! without knowing which store backs it.

use async_trait::async_trait;

use crate::domain::{Credentials, Error, Role, Username};

/// Signup and login for both account tables.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityCommand: Send + Sync {
    /// Register a new account for `role`.
    ///
    /// # Errors
    /// `conflict` when the username is already taken in that table.
    async fn sign_up(&self, role: Role, credentials: &Credentials) -> Result<Username, Error>;

    /// Check credentials against the `role` table.
    ///
    /// # Errors
    /// `unauthorized` for an unknown username or a wrong password.
    async fn log_in(&self, role: Role, credentials: &Credentials) -> Result<Username, Error>;
}
