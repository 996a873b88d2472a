//! Mutex-guarded stock counts.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{InventoryRepository, InventoryRepositoryError};
use crate::domain::{BloodType, InventoryLevels, InventoryUpdate};

use super::poisoned;

/// Volatile [`InventoryRepository`].
#[derive(Debug, Default)]
pub struct MemoryInventoryRepository {
    counts: Mutex<BTreeMap<BloodType, u32>>,
}

impl MemoryInventoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-loaded with `entries`.
    pub fn with_levels(entries: impl IntoIterator<Item = (BloodType, u32)>) -> Self {
        Self {
            counts: Mutex::new(entries.into_iter().collect()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<BloodType, u32>>, InventoryRepositoryError> {
        self.counts
            .lock()
            .map_err(|_| InventoryRepositoryError::connection(poisoned("inventory")))
    }
}

#[async_trait]
impl InventoryRepository for MemoryInventoryRepository {
    async fn levels(&self) -> Result<InventoryLevels, InventoryRepositoryError> {
        let counts = self.lock()?;
        Ok(InventoryLevels::from_entries(
            counts.iter().map(|(bt, qty)| (*bt, *qty)),
        ))
    }

    async fn apply_update(&self, update: &InventoryUpdate) -> Result<(), InventoryRepositoryError> {
        let mut counts = self.lock()?;
        for (blood_type, quantity) in update.iter() {
            counts.insert(blood_type, quantity);
        }
        Ok(())
    }

    async fn adjust(
        &self,
        blood_type: BloodType,
        delta: i64,
    ) -> Result<u32, InventoryRepositoryError> {
        let mut counts = self.lock()?;
        let available = counts.get(&blood_type).copied().unwrap_or(0);
        let next = i64::from(available) + delta;
        let Ok(next) = u32::try_from(next) else {
            if next < 0 {
                return Err(InventoryRepositoryError::insufficient_stock(
                    blood_type,
                    available,
                    delta.unsigned_abs(),
                ));
            }
            return Err(InventoryRepositoryError::query(format!(
                "{blood_type} count would exceed {}",
                u32::MAX
            )));
        };
        counts.insert(blood_type, next);
        Ok(next)
    }
}
