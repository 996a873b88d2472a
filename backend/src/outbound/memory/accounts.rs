//! Mutex-guarded user and admin tables.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{AdminAccount, UserAccount, Username};

use super::poisoned;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Username, UserAccount>,
    admins: HashMap<Username, AdminAccount>,
}

/// Volatile [`AccountRepository`].
#[derive(Debug, Default)]
pub struct MemoryAccountRepository {
    tables: Mutex<Tables>,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AccountRepositoryError> {
        self.tables
            .lock()
            .map_err(|_| AccountRepositoryError::connection(poisoned("account")))
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn find_user(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, AccountRepositoryError> {
        Ok(self.lock()?.users.get(username).cloned())
    }

    async fn insert_user(&self, account: &UserAccount) -> Result<(), AccountRepositoryError> {
        let mut tables = self.lock()?;
        if tables.users.contains_key(&account.username) {
            return Err(AccountRepositoryError::duplicate(account.username.to_string()));
        }
        tables
            .users
            .insert(account.username.clone(), account.clone());
        Ok(())
    }

    async fn record_donation(
        &self,
        username: &Username,
        date: NaiveDate,
    ) -> Result<(), AccountRepositoryError> {
        let mut tables = self.lock()?;
        let account = tables
            .users
            .get_mut(username)
            .ok_or_else(|| AccountRepositoryError::unknown_account(username.to_string()))?;
        account.last_donation = Some(date);
        Ok(())
    }

    async fn find_admin(
        &self,
        username: &Username,
    ) -> Result<Option<AdminAccount>, AccountRepositoryError> {
        Ok(self.lock()?.admins.get(username).cloned())
    }

    async fn insert_admin(&self, account: &AdminAccount) -> Result<(), AccountRepositoryError> {
        let mut tables = self.lock()?;
        if tables.admins.contains_key(&account.username) {
            return Err(AccountRepositoryError::duplicate(account.username.to_string()));
        }
        tables
            .admins
            .insert(account.username.clone(), account.clone());
        Ok(())
    }
}
