//! Driving ports for the blood bank use-cases.
//!
//! [`BloodBankCommand`] covers every mutation of stock and requests;
//! [`BloodBankQuery`] assembles the read models shown on dashboards. Each
//! call carries the [`Actor`] so authorisation happens in the domain rather
//! than in the transport.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    Actor, BloodRequest, BloodType, Eligibility, Error, InventoryLevels, InventoryUpdate,
    RequestId, Urgency, Username,
};

/// Parameters of a new blood request as submitted by a user.
///
/// `quantity` is signed so non-positive input reaches the domain and is
/// rejected there with a specific reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBloodRequest {
    pub blood_type: BloodType,
    pub quantity: i64,
    pub urgency: Urgency,
}

/// Result of an admin dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReceipt {
    /// The request after the transition to `Dispatched`.
    pub request: BloodRequest,
    /// Units of the request's blood type left in stock.
    pub remaining: u32,
}

/// Result of a donation against a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationReceipt {
    /// The request after the transition to `Donated/Stocked`.
    pub request: BloodRequest,
    /// Units now in stock for the request's blood type.
    pub stocked: u32,
    pub donated_on: NaiveDate,
}

/// Result of an admin bulk inventory update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryUpdateOutcome {
    pub inventory: InventoryLevels,
    pub low_stock: Vec<BloodType>,
}

/// Read model for the user dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDashboard {
    pub username: Username,
    pub inventory: InventoryLevels,
    pub requests: Vec<BloodRequest>,
    pub eligibility: Eligibility,
}

/// Read model for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminDashboard {
    pub username: Username,
    pub inventory: InventoryLevels,
    pub requests: Vec<BloodRequest>,
    pub low_stock: Vec<BloodType>,
}

/// Mutations of stock and requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BloodBankCommand: Send + Sync {
    /// Open a request on behalf of a signed-in user.
    async fn request_blood(
        &self,
        actor: &Actor,
        request: NewBloodRequest,
    ) -> Result<BloodRequest, Error>;

    /// Remove one of the actor's own open requests.
    async fn cancel_request(&self, actor: &Actor, id: &RequestId) -> Result<(), Error>;

    /// Donate units to another user's request.
    async fn donate(&self, actor: &Actor, id: &RequestId) -> Result<DonationReceipt, Error>;

    /// Dispatch stock to satisfy an open request (admins only).
    async fn fulfill(&self, actor: &Actor, id: &RequestId) -> Result<DispatchReceipt, Error>;

    /// Overwrite stock counts (admins only) and report low-stock types.
    async fn update_inventory(
        &self,
        actor: &Actor,
        update: InventoryUpdate,
    ) -> Result<InventoryUpdateOutcome, Error>;
}

/// Dashboard read models.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BloodBankQuery: Send + Sync {
    async fn user_dashboard(&self, actor: &Actor) -> Result<UserDashboard, Error>;

    async fn admin_dashboard(&self, actor: &Actor) -> Result<AdminDashboard, Error>;

    /// Eligibility for any username; unknown names have no donation on record.
    async fn eligibility(&self, username: &Username) -> Result<Eligibility, Error>;
}
