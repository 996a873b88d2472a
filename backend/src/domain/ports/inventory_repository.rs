//! Driven port for blood stock persistence.

use async_trait::async_trait;

use crate::domain::{BloodType, InventoryLevels, InventoryUpdate};

use super::define_port_error;

define_port_error! {
    /// Errors raised by inventory repository adapters.
    pub enum InventoryRepositoryError {
        /// Store could not be reached.
        Connection { message: String } => "inventory repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "inventory repository query failed: {message}",
        /// An adjustment would have driven the count below zero.
        InsufficientStock { blood_type: BloodType, available: u32, requested: u64 } =>
            "insufficient {blood_type} stock: {available} available, {requested} requested",
    }
}

/// Per-blood-type unit counts.
///
/// Implementations must keep every stored count non-negative and apply
/// [`adjust`](InventoryRepository::adjust) atomically per blood type.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Snapshot of every blood type; missing entries read as zero.
    async fn levels(&self) -> Result<InventoryLevels, InventoryRepositoryError>;

    /// Overwrite the counts named in `update`, leaving other types untouched.
    async fn apply_update(&self, update: &InventoryUpdate) -> Result<(), InventoryRepositoryError>;

    /// Add `delta` units and return the new count.
    ///
    /// Fails with [`InventoryRepositoryError::InsufficientStock`] and leaves
    /// the count unchanged when the result would be negative.
    async fn adjust(
        &self,
        blood_type: BloodType,
        delta: i64,
    ) -> Result<u32, InventoryRepositoryError>;
}
