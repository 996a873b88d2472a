//! OpenAPI document for the gateway.
//!
//! Served through Swagger UI in debug builds and exported by the
//! `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::CredentialsRequest;
use crate::inbound::http::requests::RequestBloodBody;
use crate::inbound::http::views::{
    AccountView, AdminDashboardView, BloodRequestView, DispatchView, DonationView,
    EligibilityView, InventoryEntryView, InventoryUpdateView, UserDashboardView,
};

/// Registers the session cookie security scheme.
struct SessionCookieAddon;

impl Modify for SessionCookieAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /login or POST /admin/login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SessionCookieAddon),
    info(
        title = "BloodBridge API",
        description = "Blood inventory and request reconciliation for donors, requesters and blood bank admins."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::signup_user,
        crate::inbound::http::auth::login_user,
        crate::inbound::http::auth::logout_user,
        crate::inbound::http::auth::signup_admin,
        crate::inbound::http::auth::login_admin,
        crate::inbound::http::auth::logout_admin,
        crate::inbound::http::requests::user_dashboard,
        crate::inbound::http::requests::request_blood,
        crate::inbound::http::requests::cancel_request,
        crate::inbound::http::requests::donate,
        crate::inbound::http::admin::admin_dashboard,
        crate::inbound::http::admin::update_inventory,
        crate::inbound::http::admin::fulfill_request,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        CredentialsRequest,
        RequestBloodBody,
        AccountView,
        InventoryEntryView,
        BloodRequestView,
        EligibilityView,
        UserDashboardView,
        AdminDashboardView,
        InventoryUpdateView,
        DispatchView,
        DonationView,
    )),
    tags(
        (name = "auth", description = "User signup, login and logout"),
        (name = "requests", description = "Blood requests and donations"),
        (name = "admin", description = "Inventory management and dispatch"),
        (name = "health", description = "Orchestrator probes")
    )
)]
pub struct ApiDoc;
