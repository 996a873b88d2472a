//! JSON views returned by the gateway.
//!
//! Domain types stay free of transport concerns; these structs own the wire
//! shape (camelCase, labels as strings) and the OpenAPI schema.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{
    AdminDashboard, DispatchReceipt, DonationReceipt, InventoryUpdateOutcome, UserDashboard,
};
use crate::domain::{BloodRequest, BloodType, Eligibility, InventoryLevels, Role, Username};

/// Signed-in identity returned by signup and login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    #[schema(example = "ann")]
    pub username: String,
    #[schema(example = "user")]
    pub role: String,
}

impl AccountView {
    pub fn new(role: Role, username: &Username) -> Self {
        Self {
            username: username.to_string(),
            role: role.to_string(),
        }
    }
}

/// Units held for one blood type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntryView {
    #[schema(example = "O+")]
    pub blood_type: String,
    #[schema(example = 10)]
    pub quantity: u32,
}

fn inventory_view(levels: &InventoryLevels) -> Vec<InventoryEntryView> {
    levels
        .iter()
        .map(|(blood_type, quantity)| InventoryEntryView {
            blood_type: blood_type.to_string(),
            quantity,
        })
        .collect()
}

fn labels(types: &[BloodType]) -> Vec<String> {
    types.iter().map(ToString::to_string).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequestView {
    pub id: Uuid,
    #[schema(example = "ann")]
    pub requester: String,
    #[schema(example = "A+")]
    pub blood_type: String,
    #[schema(example = 5)]
    pub quantity: u32,
    #[schema(example = "High")]
    pub urgency: String,
    #[schema(example = "Open")]
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&BloodRequest> for BloodRequestView {
    fn from(request: &BloodRequest) -> Self {
        Self {
            id: *request.id.as_uuid(),
            requester: request.requester.to_string(),
            blood_type: request.blood_type.to_string(),
            quantity: request.quantity,
            urgency: request.urgency.to_string(),
            status: request.status.to_string(),
            created_at: request.created_at,
        }
    }
}

fn requests_view(requests: &[BloodRequest]) -> Vec<BloodRequestView> {
    requests.iter().map(BloodRequestView::from).collect()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityView {
    pub eligible: bool,
    /// Days until the donor may give again; zero when eligible.
    pub days_remaining: u32,
}

impl From<Eligibility> for EligibilityView {
    fn from(value: Eligibility) -> Self {
        Self {
            eligible: value.eligible,
            days_remaining: value.days_remaining,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDashboardView {
    pub username: String,
    pub inventory: Vec<InventoryEntryView>,
    pub requests: Vec<BloodRequestView>,
    pub eligibility: EligibilityView,
}

impl From<UserDashboard> for UserDashboardView {
    fn from(dashboard: UserDashboard) -> Self {
        Self {
            username: dashboard.username.to_string(),
            inventory: inventory_view(&dashboard.inventory),
            requests: requests_view(&dashboard.requests),
            eligibility: dashboard.eligibility.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardView {
    pub username: String,
    pub inventory: Vec<InventoryEntryView>,
    pub requests: Vec<BloodRequestView>,
    /// Blood types below the low-stock threshold.
    #[schema(example = json!(["AB-"]))]
    pub low_stock: Vec<String>,
}

impl From<AdminDashboard> for AdminDashboardView {
    fn from(dashboard: AdminDashboard) -> Self {
        Self {
            username: dashboard.username.to_string(),
            inventory: inventory_view(&dashboard.inventory),
            requests: requests_view(&dashboard.requests),
            low_stock: labels(&dashboard.low_stock),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryUpdateView {
    pub inventory: Vec<InventoryEntryView>,
    pub low_stock: Vec<String>,
}

impl From<InventoryUpdateOutcome> for InventoryUpdateView {
    fn from(outcome: InventoryUpdateOutcome) -> Self {
        Self {
            inventory: inventory_view(&outcome.inventory),
            low_stock: labels(&outcome.low_stock),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispatchView {
    pub request: BloodRequestView,
    /// Units of the request's blood type left after dispatch.
    pub remaining: u32,
}

impl From<DispatchReceipt> for DispatchView {
    fn from(receipt: DispatchReceipt) -> Self {
        Self {
            request: BloodRequestView::from(&receipt.request),
            remaining: receipt.remaining,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationView {
    pub request: BloodRequestView,
    /// Units of the request's blood type in stock after the donation.
    pub stocked: u32,
    pub donated_on: NaiveDate,
}

impl From<DonationReceipt> for DonationView {
    fn from(receipt: DonationReceipt) -> Self {
        Self {
            request: BloodRequestView::from(&receipt.request),
            stocked: receipt.stocked,
            donated_on: receipt.donated_on,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::{RequestStatus, Urgency};

    fn request() -> BloodRequest {
        let created = Utc
            .with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
            .single()
            .expect("valid instant");
        let mut request = BloodRequest::open(
            Username::new("ann").expect("username"),
            BloodType::AbNegative,
            2,
            Urgency::Critical,
            created,
        );
        request.status = RequestStatus::DonatedStocked;
        request
    }

    #[rstest]
    fn request_view_uses_labels_and_camel_case() {
        let value = serde_json::to_value(BloodRequestView::from(&request())).expect("json");
        assert_eq!(value["bloodType"], json!("AB-"));
        assert_eq!(value["urgency"], json!("Critical"));
        assert_eq!(value["status"], json!("Donated/Stocked"));
        assert_eq!(value["createdAt"], json!("2024-05-01T09:00:00Z"));
    }

    #[rstest]
    fn admin_dashboard_lists_every_type_and_low_stock() {
        let inventory = InventoryLevels::from_entries(
            BloodType::ALL.into_iter().map(|bt| (bt, 5)).chain([(BloodType::BNegative, 1)]),
        );
        let view = AdminDashboardView::from(AdminDashboard {
            username: Username::new("root").expect("username"),
            low_stock: inventory.low_stock(),
            inventory,
            requests: vec![request()],
        });

        let value = serde_json::to_value(&view).expect("json");
        assert_eq!(value["inventory"].as_array().map(Vec::len), Some(8));
        assert_eq!(value["lowStock"], json!(["B-"]));
        assert_eq!(value["requests"][0]["requester"], Value::from("ann"));
    }

    #[rstest]
    fn eligibility_view_reports_days_remaining() {
        let view = EligibilityView::from(Eligibility {
            eligible: false,
            days_remaining: 12,
        });
        let value = serde_json::to_value(view).expect("json");
        assert_eq!(value, json!({ "eligible": false, "daysRemaining": 12 }));
    }
}
