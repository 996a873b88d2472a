//! Driven port for user and admin account persistence.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{AdminAccount, UserAccount, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Store could not be reached.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// An account with this username already exists.
        Duplicate { username: String } => "account {username} already exists",
        /// No account has this username.
        UnknownAccount { username: String } => "account {username} does not exist",
    }
}

/// Accounts keyed by username, with users and admins in separate tables.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_user(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, AccountRepositoryError>;

    /// Insert a user; fails with `Duplicate` when the username is taken.
    async fn insert_user(&self, account: &UserAccount) -> Result<(), AccountRepositoryError>;

    /// Set the user's last donation date.
    async fn record_donation(
        &self,
        username: &Username,
        date: NaiveDate,
    ) -> Result<(), AccountRepositoryError>;

    async fn find_admin(
        &self,
        username: &Username,
    ) -> Result<Option<AdminAccount>, AccountRepositoryError>;

    /// Insert an admin; fails with `Duplicate` when the username is taken.
    async fn insert_admin(&self, account: &AdminAccount) -> Result<(), AccountRepositoryError>;
}
