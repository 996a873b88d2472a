//! Signup and login over the account repository.
//!
//! Users and admins live in separate tables; the same username may exist in
//! both. Passwords are compared verbatim.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::notifications::{Notice, notify_best_effort};
use crate::domain::ports::{AccountRepository, AccountRepositoryError, IdentityCommand, Notifier};
use crate::domain::reconciliation::ReconciliationError;
use crate::domain::{AdminAccount, Credentials, Error, Role, UserAccount, Username};

/// [`IdentityCommand`] implementation backed by an [`AccountRepository`].
pub struct IdentityService<A> {
    accounts: Arc<A>,
    notifier: Arc<dyn Notifier>,
}

impl<A> Clone for IdentityService<A> {
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<A> IdentityService<A> {
    pub fn new(accounts: Arc<A>, notifier: Arc<dyn Notifier>) -> Self {
        Self { accounts, notifier }
    }
}

fn map_repository_error(role: Role, error: AccountRepositoryError) -> Error {
    let error = match error {
        AccountRepositoryError::Duplicate { username } => {
            ReconciliationError::AlreadyExists { role, username }
        }
        AccountRepositoryError::UnknownAccount { .. } => ReconciliationError::InvalidCredentials,
        other => ReconciliationError::from(other),
    };
    Error::from(error)
}

fn invalid_credentials() -> Error {
    Error::from(ReconciliationError::InvalidCredentials)
}

#[async_trait]
impl<A> IdentityCommand for IdentityService<A>
where
    A: AccountRepository,
{
    async fn sign_up(&self, role: Role, credentials: &Credentials) -> Result<Username, Error> {
        let username = credentials.username().clone();
        let notice = match role {
            Role::User => {
                self.accounts
                    .insert_user(&UserAccount::new(credentials))
                    .await
                    .map_err(|err| map_repository_error(role, err))?;
                Notice::user_signup(&username)
            }
            Role::Admin => {
                self.accounts
                    .insert_admin(&AdminAccount::new(credentials))
                    .await
                    .map_err(|err| map_repository_error(role, err))?;
                Notice::admin_signup(&username)
            }
        };
        info!(%role, username = %username, "account created");
        notify_best_effort(self.notifier.as_ref(), notice).await;
        Ok(username)
    }

    async fn log_in(&self, role: Role, credentials: &Credentials) -> Result<Username, Error> {
        let username = credentials.username();
        let matches = match role {
            Role::User => self
                .accounts
                .find_user(username)
                .await
                .map_err(|err| map_repository_error(role, err))?
                .is_some_and(|account| account.password_matches(credentials.password())),
            Role::Admin => self
                .accounts
                .find_admin(username)
                .await
                .map_err(|err| map_repository_error(role, err))?
                .is_some_and(|account| account.password_matches(credentials.password())),
        };
        if !matches {
            info!(%role, username = %username, "login rejected");
            return Err(invalid_credentials());
        }

        info!(%role, username = %username, "login succeeded");
        if role == Role::User {
            notify_best_effort(self.notifier.as_ref(), Notice::user_login(username)).await;
        }
        Ok(username.clone())
    }
}
