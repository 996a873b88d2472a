//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types are fallible
//! because stored labels are plain strings.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{admin_accounts, blood_inventory, blood_requests, user_accounts};

// ---------------------------------------------------------------------------
// Account models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserAccountRow {
    pub username: String,
    pub password: String,
    pub last_donation: Option<NaiveDate>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_accounts)]
pub(crate) struct NewUserAccountRow<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub last_donation: Option<NaiveDate>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = admin_accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AdminAccountRow {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = admin_accounts)]
pub(crate) struct NewAdminAccountRow<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

// ---------------------------------------------------------------------------
// Inventory models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = blood_inventory)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InventoryRow {
    pub blood_type: String,
    pub quantity: i64,
}

// ---------------------------------------------------------------------------
// Request models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = blood_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BloodRequestRow {
    pub id: Uuid,
    pub requester: String,
    pub blood_type: String,
    pub quantity: i64,
    pub urgency: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = blood_requests)]
pub(crate) struct NewBloodRequestRow<'a> {
    pub id: Uuid,
    pub requester: &'a str,
    pub blood_type: &'a str,
    pub quantity: i64,
    pub urgency: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}
