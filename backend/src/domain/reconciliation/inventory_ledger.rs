//! Admin bulk updates and low-stock alerts.

use tracing::info;

use super::{ReconciliationEngine, ReconciliationError, require_admin};
use crate::domain::notifications::{Notice, notify_best_effort};
use crate::domain::ports::{InventoryRepository, InventoryUpdateOutcome};
use crate::domain::{Actor, InventoryLevels, InventoryUpdate};

impl<I, R, A> ReconciliationEngine<I, R, A>
where
    I: InventoryRepository,
{
    /// Current stock for every blood type.
    pub async fn inventory(&self) -> Result<InventoryLevels, ReconciliationError> {
        Ok(self.inventory.levels().await?)
    }

    /// Write the counts in `update` and alert on every type below threshold.
    ///
    /// The alert scans the whole inventory after the write, so types not
    /// named in `update` are reported too.
    pub async fn set_inventory(
        &self,
        actor: &Actor,
        update: &InventoryUpdate,
    ) -> Result<InventoryUpdateOutcome, ReconciliationError> {
        let admin = require_admin(actor)?;
        if !update.is_empty() {
            self.inventory.apply_update(update).await?;
        }
        let inventory = self.inventory.levels().await?;
        let low_stock = inventory.low_stock();
        info!(
            admin = %admin,
            updated = update.iter().count(),
            low_stock = low_stock.len(),
            "inventory updated"
        );
        if let Some(notice) = Notice::low_stock(&low_stock) {
            notify_best_effort(self.notifier.as_ref(), notice).await;
        }
        Ok(InventoryUpdateOutcome {
            inventory,
            low_stock,
        })
    }
}
