//! Donor contributions: units move into stock and close a request.

use tracing::{info, warn};

use super::{ReconciliationEngine, ReconciliationError, require_user};
use crate::domain::ports::{
    AccountRepository, DonationReceipt, InventoryRepository, RequestRepository,
};
use crate::domain::{Actor, BloodRequest, Eligibility, RequestId, RequestStatus, Role, Username};

impl<I, R, A> ReconciliationEngine<I, R, A>
where
    A: AccountRepository,
{
    /// Eligibility of `username` as of the clock's current date.
    ///
    /// Unknown usernames have no donation on record and are eligible.
    pub async fn is_eligible(&self, username: &Username) -> Result<Eligibility, ReconciliationError> {
        let last = self
            .accounts
            .find_user(username)
            .await?
            .and_then(|account| account.last_donation);
        Ok(Eligibility::evaluate(last, self.today()))
    }
}

impl<I, R, A> ReconciliationEngine<I, R, A>
where
    I: InventoryRepository,
    R: RequestRepository,
    A: AccountRepository,
{
    /// Donate the request's units on behalf of the signed-in user.
    ///
    /// Checks run in order: session, account, eligibility, request
    /// existence, self-donation. The request status is not checked, so a
    /// second eligible donor adds the units again.
    ///
    /// If the status write fails the added units are taken back out. Once
    /// the status is written the donation stands; a failure to record the
    /// donation date is only logged.
    pub async fn donate_to(
        &self,
        actor: &Actor,
        id: &RequestId,
    ) -> Result<DonationReceipt, ReconciliationError> {
        let donor = require_user(actor)?;
        let account = self
            .accounts
            .find_user(donor)
            .await?
            .ok_or(ReconciliationError::Unauthorized { role: Role::User })?;

        let today = self.today();
        let eligibility = Eligibility::evaluate(account.last_donation, today);
        if !eligibility.eligible {
            return Err(ReconciliationError::NotEligible {
                days_remaining: eligibility.days_remaining,
            });
        }

        let request = self
            .requests
            .find(id)
            .await?
            .ok_or(ReconciliationError::NotFound { id: *id })?;
        if request.is_owned_by(donor) {
            return Err(ReconciliationError::SelfDonationForbidden);
        }

        let stocked = self
            .inventory
            .adjust(request.blood_type, i64::from(request.quantity))
            .await?;
        if let Err(error) = self
            .requests
            .update_status(id, RequestStatus::DonatedStocked, None)
            .await
        {
            self.unstock(&request).await;
            return Err(error.into());
        }
        if let Err(error) = self.accounts.record_donation(donor, today).await {
            warn!(
                donor = %donor,
                request_id = %id,
                error = %error,
                "failed to record donation date"
            );
        }

        info!(
            request_id = %id,
            donor = %donor,
            blood_type = %request.blood_type,
            quantity = request.quantity,
            stocked,
            "donation stocked"
        );
        Ok(DonationReceipt {
            request: BloodRequest {
                status: RequestStatus::DonatedStocked,
                ..request
            },
            stocked,
            donated_on: today,
        })
    }

    /// Take back units added for a donation whose status write failed.
    async fn unstock(&self, request: &BloodRequest) {
        let units = i64::from(request.quantity);
        if let Err(error) = self.inventory.adjust(request.blood_type, -units).await {
            warn!(
                request_id = %request.id,
                blood_type = %request.blood_type,
                quantity = request.quantity,
                error = %error,
                "failed to take back units after aborted donation"
            );
        }
    }
}
