//! Opening, cancelling and listing requests.

use tracing::info;

use super::{ReconciliationEngine, ReconciliationError, require_user};
use crate::domain::notifications::{Notice, notify_best_effort};
use crate::domain::ports::{NewBloodRequest, RequestRepository, RequestRepositoryError};
use crate::domain::{Actor, BloodRequest, RequestId, RequestStatus};

impl<I, R, A> ReconciliationEngine<I, R, A>
where
    R: RequestRepository,
{
    /// Open a request for the signed-in user.
    ///
    /// # Errors
    /// - `Unauthorized` without a user session.
    /// - `InvalidQuantity` unless `quantity` is a positive unit count.
    pub async fn create_request(
        &self,
        actor: &Actor,
        new: NewBloodRequest,
    ) -> Result<BloodRequest, ReconciliationError> {
        let requester = require_user(actor)?;
        let quantity = u32::try_from(new.quantity)
            .ok()
            .filter(|qty| *qty > 0)
            .ok_or(ReconciliationError::InvalidQuantity {
                quantity: new.quantity,
            })?;

        let request = BloodRequest::open(
            requester.clone(),
            new.blood_type,
            quantity,
            new.urgency,
            self.clock.utc(),
        );
        self.requests.insert(&request).await?;
        info!(
            request_id = %request.id,
            requester = %request.requester,
            blood_type = %request.blood_type,
            quantity,
            urgency = %request.urgency,
            "blood request opened"
        );

        notify_best_effort(
            self.notifier.as_ref(),
            Notice::new_request(request.blood_type, &request.requester),
        )
        .await;
        Ok(request)
    }

    /// Remove one of the actor's own open requests.
    ///
    /// Ownership is checked before status, so a foreign request is reported
    /// as `Forbidden` whatever its state.
    pub async fn cancel(&self, actor: &Actor, id: &RequestId) -> Result<(), ReconciliationError> {
        let username = require_user(actor)?;
        let request = self
            .requests
            .find(id)
            .await?
            .ok_or(ReconciliationError::NotFound { id: *id })?;

        if !request.is_owned_by(username) {
            return Err(ReconciliationError::Forbidden {
                reason: "you can only cancel your own requests",
            });
        }
        if !request.status.is_open() {
            return Err(ReconciliationError::InvalidState {
                id: *id,
                status: request.status,
            });
        }

        match self.requests.delete(id, RequestStatus::Open).await {
            Ok(()) => {
                info!(request_id = %id, requester = %username, "blood request cancelled");
                Ok(())
            }
            Err(RequestRepositoryError::StatusMismatch { actual, .. }) => {
                Err(ReconciliationError::InvalidState {
                    id: *id,
                    status: actual,
                })
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Every request in store order.
    pub async fn list_requests(&self) -> Result<Vec<BloodRequest>, ReconciliationError> {
        Ok(self.requests.list().await?)
    }
}
