//! HTTP gateway: JSON endpoints over the blood bank and identity ports.

pub mod admin;
pub mod auth;
pub mod error;
pub mod health;
pub mod requests;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
mod validation;
pub mod views;

pub use error::ApiResult;

use actix_web::web;

/// Register every gateway endpoint except the health probes.
///
/// Callers supply the session middleware, [`state::HttpState`] and the JSON
/// and path extractor configuration.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use bloodbridge::inbound::http;
///
/// let app = App::new().service(web::scope("").configure(http::configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::signup_user)
        .service(auth::login_user)
        .service(auth::logout_user)
        .service(auth::signup_admin)
        .service(auth::login_admin)
        .service(auth::logout_admin)
        .service(requests::user_dashboard)
        .service(requests::request_blood)
        .service(requests::cancel_request)
        .service(requests::donate)
        .service(admin::admin_dashboard)
        .service(admin::update_inventory)
        .service(admin::fulfill_request);
}
