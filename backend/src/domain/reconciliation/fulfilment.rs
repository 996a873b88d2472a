//! Admin dispatch: stock moves out to satisfy an open request.

use tracing::{info, warn};

use super::{ReconciliationEngine, ReconciliationError, require_admin};
use crate::domain::ports::{
    DispatchReceipt, InventoryRepository, RequestRepository, RequestRepositoryError,
};
use crate::domain::{Actor, BloodRequest, RequestId, RequestStatus};

impl<I, R, A> ReconciliationEngine<I, R, A>
where
    I: InventoryRepository,
    R: RequestRepository,
{
    /// Deduct the request's units from stock and mark it `Dispatched`.
    ///
    /// A request that is missing or no longer open reads as `NotFound`, so a
    /// repeated dispatch never deducts twice. Without enough stock nothing
    /// changes and `InsufficientStock` is returned.
    pub async fn dispatch(
        &self,
        actor: &Actor,
        id: &RequestId,
    ) -> Result<DispatchReceipt, ReconciliationError> {
        let admin = require_admin(actor)?;
        let request = self
            .requests
            .find(id)
            .await?
            .filter(|request| request.status.is_open())
            .ok_or(ReconciliationError::NotFound { id: *id })?;

        let units = i64::from(request.quantity);
        let remaining = self.inventory.adjust(request.blood_type, -units).await?;

        if let Err(error) = self
            .requests
            .update_status(id, RequestStatus::Dispatched, Some(RequestStatus::Open))
            .await
        {
            self.restock(&request).await;
            return Err(match error {
                RequestRepositoryError::StatusMismatch { .. }
                | RequestRepositoryError::NotFound { .. } => {
                    ReconciliationError::NotFound { id: *id }
                }
                other => other.into(),
            });
        }

        info!(
            request_id = %id,
            admin = %admin,
            blood_type = %request.blood_type,
            quantity = request.quantity,
            remaining,
            "blood request dispatched"
        );
        Ok(DispatchReceipt {
            request: BloodRequest {
                status: RequestStatus::Dispatched,
                ..request
            },
            remaining,
        })
    }

    /// Return units deducted for a dispatch that lost a race.
    async fn restock(&self, request: &BloodRequest) {
        let units = i64::from(request.quantity);
        if let Err(error) = self.inventory.adjust(request.blood_type, units).await {
            warn!(
                request_id = %request.id,
                blood_type = %request.blood_type,
                quantity = request.quantity,
                error = %error,
                "failed to restock units after aborted dispatch"
            );
        }
    }
}
