//! PostgreSQL-backed `InventoryRepository` implementation using Diesel ORM.
//!
//! Adjustments are a single conditional `UPDATE`, so concurrent callers can
//! never drive a count below zero.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{InventoryRepository, InventoryRepositoryError};
use crate::domain::{BloodType, InventoryLevels, InventoryUpdate};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, stored_count};
use super::models::InventoryRow;
use super::pool::{DbPool, PoolError};
use super::schema::blood_inventory;

/// Diesel-backed implementation of the `InventoryRepository` port.
#[derive(Clone)]
pub struct DieselInventoryRepository {
    pool: DbPool,
}

impl DieselInventoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> InventoryRepositoryError {
    map_pool_error(error, InventoryRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> InventoryRepositoryError {
    map_diesel_error(
        error,
        InventoryRepositoryError::query,
        InventoryRepositoryError::connection,
    )
}

fn count(value: i64) -> Result<u32, InventoryRepositoryError> {
    stored_count(value, InventoryRepositoryError::query)
}

#[async_trait]
impl InventoryRepository for DieselInventoryRepository {
    async fn levels(&self) -> Result<InventoryLevels, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<InventoryRow> = blood_inventory::table
            .select(InventoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            match BloodType::from_str(&row.blood_type) {
                Ok(blood_type) => entries.push((blood_type, count(row.quantity)?)),
                Err(error) => warn!(
                    label = %row.blood_type,
                    error = %error,
                    "skipping inventory row with unknown blood type"
                ),
            }
        }
        Ok(InventoryLevels::from_entries(entries))
    }

    async fn apply_update(&self, update: &InventoryUpdate) -> Result<(), InventoryRepositoryError> {
        let rows: Vec<InventoryRow> = update
            .iter()
            .map(|(blood_type, quantity)| InventoryRow {
                blood_type: blood_type.label().to_owned(),
                quantity: i64::from(quantity),
            })
            .collect();
        if rows.is_empty() {
            return Ok(());
        }

        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(blood_inventory::table)
            .values(&rows)
            .on_conflict(blood_inventory::blood_type)
            .do_update()
            .set(blood_inventory::quantity.eq(excluded(blood_inventory::quantity)))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn adjust(
        &self,
        blood_type: BloodType,
        delta: i64,
    ) -> Result<u32, InventoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let label = blood_type.label();

        let updated: Option<i64> = diesel::update(
            blood_inventory::table
                .filter(blood_inventory::blood_type.eq(label))
                .filter((blood_inventory::quantity + delta).ge(0_i64)),
        )
        .set(blood_inventory::quantity.eq(blood_inventory::quantity + delta))
        .returning(blood_inventory::quantity)
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(diesel_error)?;
        if let Some(next) = updated {
            return count(next);
        }

        let available: Option<i64> = blood_inventory::table
            .filter(blood_inventory::blood_type.eq(label))
            .select(blood_inventory::quantity)
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        match available {
            Some(available) => Err(InventoryRepositoryError::insufficient_stock(
                blood_type,
                count(available)?,
                delta.unsigned_abs(),
            )),
            None if delta < 0 => Err(InventoryRepositoryError::insufficient_stock(
                blood_type,
                0_u32,
                delta.unsigned_abs(),
            )),
            None => {
                let next: i64 = diesel::insert_into(blood_inventory::table)
                    .values(InventoryRow {
                        blood_type: label.to_owned(),
                        quantity: delta,
                    })
                    .on_conflict(blood_inventory::blood_type)
                    .do_update()
                    .set(blood_inventory::quantity.eq(blood_inventory::quantity + delta))
                    .returning(blood_inventory::quantity)
                    .get_result(&mut conn)
                    .await
                    .map_err(diesel_error)?;
                count(next)
            }
        }
    }
}
