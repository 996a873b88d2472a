//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use zeroize::Zeroizing;

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{AdminAccount, UserAccount, Username};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{AdminAccountRow, NewAdminAccountRow, NewUserAccountRow, UserAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::{admin_accounts, user_accounts};

/// Diesel-backed implementation of the `AccountRepository` port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> AccountRepositoryError {
    map_pool_error(error, AccountRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> AccountRepositoryError {
    map_diesel_error(
        error,
        AccountRepositoryError::query,
        AccountRepositoryError::connection,
    )
}

fn insert_error(error: diesel::result::Error, username: &Username) -> AccountRepositoryError {
    if is_unique_violation(&error) {
        AccountRepositoryError::duplicate(username.to_string())
    } else {
        diesel_error(error)
    }
}

fn stored_username(raw: &str) -> Result<Username, AccountRepositoryError> {
    Username::new(raw)
        .map_err(|_| AccountRepositoryError::query(format!("stored username is invalid: {raw:?}")))
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn find_user(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<UserAccountRow> = user_accounts::table
            .filter(user_accounts::username.eq(username.as_ref()))
            .select(UserAccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(|row| {
            Ok(UserAccount {
                username: stored_username(&row.username)?,
                password: Zeroizing::new(row.password),
                last_donation: row.last_donation,
            })
        })
        .transpose()
    }

    async fn insert_user(&self, account: &UserAccount) -> Result<(), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewUserAccountRow {
            username: account.username.as_ref(),
            password: account.password.as_str(),
            last_donation: account.last_donation,
        };
        diesel::insert_into(user_accounts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| insert_error(err, &account.username))
    }

    async fn record_donation(
        &self,
        username: &Username,
        date: NaiveDate,
    ) -> Result<(), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(
            user_accounts::table.filter(user_accounts::username.eq(username.as_ref())),
        )
        .set(user_accounts::last_donation.eq(Some(date)))
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;

        if updated == 0 {
            return Err(AccountRepositoryError::unknown_account(username.to_string()));
        }
        Ok(())
    }

    async fn find_admin(
        &self,
        username: &Username,
    ) -> Result<Option<AdminAccount>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<AdminAccountRow> = admin_accounts::table
            .filter(admin_accounts::username.eq(username.as_ref()))
            .select(AdminAccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(|row| {
            Ok(AdminAccount {
                username: stored_username(&row.username)?,
                password: Zeroizing::new(row.password),
            })
        })
        .transpose()
    }

    async fn insert_admin(&self, account: &AdminAccount) -> Result<(), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewAdminAccountRow {
            username: account.username.as_ref(),
            password: account.password.as_str(),
        };
        diesel::insert_into(admin_accounts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| insert_error(err, &account.username))
    }
}
