//! User-facing blood request endpoints.
//!
//! ```text
//! GET  /dashboard
//! POST /request-blood {"bloodType":"A+","quantity":5,"urgency":"High"}
//! POST /cancel-request/{id}
//! POST /donate/{id}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::NewBloodRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_blood_type, parse_request_id, parse_urgency};
use crate::inbound::http::views::{BloodRequestView, DonationView, UserDashboardView};

/// Body of `POST /request-blood`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestBloodBody {
    #[schema(example = "A+")]
    pub blood_type: String,
    /// Units requested; must be positive.
    #[schema(example = 5)]
    pub quantity: i64,
    #[schema(example = "High")]
    pub urgency: String,
}

impl TryFrom<RequestBloodBody> for NewBloodRequest {
    type Error = Error;

    fn try_from(body: RequestBloodBody) -> Result<Self, Self::Error> {
        Ok(Self {
            blood_type: parse_blood_type("bloodType", &body.blood_type)?,
            quantity: body.quantity,
            urgency: parse_urgency(&body.urgency)?,
        })
    }
}

/// Stock, all requests and the caller's donation eligibility.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "User dashboard", body = UserDashboardView),
        (status = 401, description = "Not signed in as a user", body = Error)
    ),
    tags = ["requests"],
    operation_id = "userDashboard"
)]
#[get("/dashboard")]
pub async fn user_dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserDashboardView>> {
    let actor = session.actor()?;
    let dashboard = state.blood_bank_query.user_dashboard(&actor).await?;
    Ok(web::Json(dashboard.into()))
}

/// Open a request for blood.
#[utoipa::path(
    post,
    path = "/request-blood",
    request_body = RequestBloodBody,
    responses(
        (status = 201, description = "Request opened", body = BloodRequestView),
        (status = 400, description = "Invalid blood type, urgency or quantity", body = Error),
        (status = 401, description = "Not signed in as a user", body = Error)
    ),
    tags = ["requests"],
    operation_id = "requestBlood"
)]
#[post("/request-blood")]
pub async fn request_blood(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RequestBloodBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.actor()?;
    let request = NewBloodRequest::try_from(payload.into_inner())?;
    let created = state.blood_bank.request_blood(&actor, request).await?;
    Ok(HttpResponse::Created().json(BloodRequestView::from(&created)))
}

/// Withdraw one of the caller's open requests.
#[utoipa::path(
    post,
    path = "/cancel-request/{id}",
    params(("id" = String, Path, description = "Request identifier")),
    responses(
        (status = 204, description = "Request removed"),
        (status = 401, description = "Not signed in as a user", body = Error),
        (status = 403, description = "Request belongs to someone else", body = Error),
        (status = 404, description = "Unknown request", body = Error),
        (status = 409, description = "Request is no longer open", body = Error)
    ),
    tags = ["requests"],
    operation_id = "cancelRequest"
)]
#[post("/cancel-request/{id}")]
pub async fn cancel_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.actor()?;
    let id = parse_request_id(&path)?;
    state.blood_bank.cancel_request(&actor, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Donate the units of another user's request into stock.
#[utoipa::path(
    post,
    path = "/donate/{id}",
    params(("id" = String, Path, description = "Request identifier")),
    responses(
        (status = 200, description = "Donation stocked", body = DonationView),
        (status = 400, description = "Donor is inside the eligibility window", body = Error),
        (status = 401, description = "Not signed in as a user", body = Error),
        (status = 403, description = "Donating to one's own request", body = Error),
        (status = 404, description = "Unknown request", body = Error)
    ),
    tags = ["requests"],
    operation_id = "donate"
)]
#[post("/donate/{id}")]
pub async fn donate(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DonationView>> {
    let actor = session.actor()?;
    let id = parse_request_id(&path)?;
    let receipt = state.blood_bank.donate(&actor, &id).await?;
    Ok(web::Json(receipt.into()))
}
