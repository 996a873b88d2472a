//! Reconciliation engine: the rules moving blood units between requests and
//! stock.
//!
//! The engine owns inventory counts and the request ledger. It is split by
//! concern:
//!
//! - `inventory_ledger`: admin bulk updates and low-stock alerts.
//! - `request_ledger`: opening, cancelling and listing requests.
//! - `fulfilment`: admin dispatch from stock to a requester.
//! - `donation`: donor contributions into stock, closing a request.
//! - `dashboards`: read models for both roles.
//!
//! Every public operation takes the [`Actor`] explicitly. Races between
//! concurrent callers are guarded by the repositories: stock adjustments are
//! atomic per blood type and status transitions are compare-and-set.

mod dashboards;
mod donation;
mod error;
mod fulfilment;
mod inventory_ledger;
mod request_ledger;


use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;

pub use error::ReconciliationError;

use crate::domain::ports::{
    AccountRepository, AdminDashboard, BloodBankCommand, BloodBankQuery, DispatchReceipt,
    DonationReceipt, InventoryRepository, InventoryUpdateOutcome, NewBloodRequest, Notifier,
    RequestRepository, UserDashboard,
};
use crate::domain::{
    Actor, BloodRequest, Eligibility, Error, InventoryUpdate, RequestId, Role, Username,
};

/// Blood bank engine over injected repositories, notifier and clock.
pub struct ReconciliationEngine<I, R, A> {
    inventory: Arc<I>,
    requests: Arc<R>,
    accounts: Arc<A>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl<I, R, A> Clone for ReconciliationEngine<I, R, A> {
    fn clone(&self) -> Self {
        Self {
            inventory: Arc::clone(&self.inventory),
            requests: Arc::clone(&self.requests),
            accounts: Arc::clone(&self.accounts),
            notifier: Arc::clone(&self.notifier),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<I, R, A> ReconciliationEngine<I, R, A> {
    pub fn new(
        inventory: Arc<I>,
        requests: Arc<R>,
        accounts: Arc<A>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inventory,
            requests,
            accounts,
            notifier,
            clock,
        }
    }

    fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }
}

fn require_user(actor: &Actor) -> Result<&Username, ReconciliationError> {
    actor
        .as_user()
        .ok_or(ReconciliationError::Unauthorized { role: Role::User })
}

fn require_admin(actor: &Actor) -> Result<&Username, ReconciliationError> {
    actor
        .as_admin()
        .ok_or(ReconciliationError::Unauthorized { role: Role::Admin })
}

#[async_trait]
impl<I, R, A> BloodBankCommand for ReconciliationEngine<I, R, A>
where
    I: InventoryRepository,
    R: RequestRepository,
    A: AccountRepository,
{
    async fn request_blood(
        &self,
        actor: &Actor,
        request: NewBloodRequest,
    ) -> Result<BloodRequest, Error> {
        self.create_request(actor, request).await.map_err(Error::from)
    }

    async fn cancel_request(&self, actor: &Actor, id: &RequestId) -> Result<(), Error> {
        self.cancel(actor, id).await.map_err(Error::from)
    }

    async fn donate(&self, actor: &Actor, id: &RequestId) -> Result<DonationReceipt, Error> {
        self.donate_to(actor, id).await.map_err(Error::from)
    }

    async fn fulfill(&self, actor: &Actor, id: &RequestId) -> Result<DispatchReceipt, Error> {
        self.dispatch(actor, id).await.map_err(Error::from)
    }

    async fn update_inventory(
        &self,
        actor: &Actor,
        update: InventoryUpdate,
    ) -> Result<InventoryUpdateOutcome, Error> {
        self.set_inventory(actor, &update)
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl<I, R, A> BloodBankQuery for ReconciliationEngine<I, R, A>
where
    I: InventoryRepository,
    R: RequestRepository,
    A: AccountRepository,
{
    async fn user_dashboard(&self, actor: &Actor) -> Result<UserDashboard, Error> {
        self.user_view(actor).await.map_err(Error::from)
    }

    async fn admin_dashboard(&self, actor: &Actor) -> Result<AdminDashboard, Error> {
        self.admin_view(actor).await.map_err(Error::from)
    }

    async fn eligibility(&self, username: &Username) -> Result<Eligibility, Error> {
        self.is_eligible(username).await.map_err(Error::from)
    }
}
