//! Administrator endpoints.
//!
//! ```text
//! GET  /admin/dashboard
//! POST /admin/dashboard {"O+": 12, "AB-": 0}
//! POST /admin/fulfill/{id}
//! ```

use std::collections::BTreeMap;

use actix_web::{get, post, web};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_inventory_update, parse_request_id};
use crate::inbound::http::views::{AdminDashboardView, DispatchView, InventoryUpdateView};

/// Stock, all requests and low-stock alerts.
#[utoipa::path(
    get,
    path = "/admin/dashboard",
    responses(
        (status = 200, description = "Admin dashboard", body = AdminDashboardView),
        (status = 401, description = "Not signed in as an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminDashboard"
)]
#[get("/admin/dashboard")]
pub async fn admin_dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AdminDashboardView>> {
    let actor = session.actor()?;
    let dashboard = state.blood_bank_query.admin_dashboard(&actor).await?;
    Ok(web::Json(dashboard.into()))
}

/// Overwrite stock counts for the blood types named in the body.
///
/// Negative counts are stored as zero; omitted types keep their count.
#[utoipa::path(
    post,
    path = "/admin/dashboard",
    request_body(
        content = BTreeMap<String, i64>,
        description = "New absolute counts keyed by blood type label",
        example = json!({ "O+": 12, "AB-": 0 })
    ),
    responses(
        (status = 200, description = "Inventory after the update", body = InventoryUpdateView),
        (status = 400, description = "Unknown blood type label", body = Error),
        (status = 401, description = "Not signed in as an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "updateInventory"
)]
#[post("/admin/dashboard")]
pub async fn update_inventory(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<BTreeMap<String, i64>>,
) -> ApiResult<web::Json<InventoryUpdateView>> {
    let actor = session.actor()?;
    let update = parse_inventory_update(payload.into_inner())?;
    let outcome = state.blood_bank.update_inventory(&actor, update).await?;
    Ok(web::Json(outcome.into()))
}

/// Dispatch stock to satisfy an open request.
#[utoipa::path(
    post,
    path = "/admin/fulfill/{id}",
    params(("id" = String, Path, description = "Request identifier")),
    responses(
        (status = 200, description = "Request dispatched", body = DispatchView),
        (status = 400, description = "Insufficient stock", body = Error),
        (status = 401, description = "Not signed in as an admin", body = Error),
        (status = 404, description = "No open request with this id", body = Error)
    ),
    tags = ["admin"],
    operation_id = "fulfillRequest"
)]
#[post("/admin/fulfill/{id}")]
pub async fn fulfill_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DispatchView>> {
    let actor = session.actor()?;
    let id = parse_request_id(&path)?;
    let receipt = state.blood_bank.fulfill(&actor, &id).await?;
    Ok(web::Json(receipt.into()))
}
