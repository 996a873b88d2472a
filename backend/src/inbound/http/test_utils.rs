//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{HttpResponse, web};

use crate::domain::ports::{MockBloodBankCommand, MockBloodBankQuery, MockIdentityCommand};
use crate::domain::{Error, Role, Username};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

pub(crate) const SESSION_COOKIE: &str = "session";

/// Session middleware with a fresh key and the `Secure` flag off.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// The session cookie set by `res`, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
}

/// Mocks backing an [`HttpState`]; unset expectations fail the test.
#[derive(Default)]
pub(crate) struct MockPorts {
    pub identity: MockIdentityCommand,
    pub command: MockBloodBankCommand,
    pub query: MockBloodBankQuery,
}

impl MockPorts {
    pub(crate) fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            Arc::new(self.identity),
            Arc::new(self.command),
            Arc::new(self.query),
        ))
    }
}

/// Route target for `POST /__session/{role}/{username}`, used to sign in
/// without going through the identity port.
pub(crate) async fn sign_in_as(
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, Error> {
    let (role, username) = path.into_inner();
    let role = match role.as_str() {
        "admin" => Role::Admin,
        _ => Role::User,
    };
    let username = Username::new(username).map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist(role, &username)?;
    Ok(HttpResponse::NoContent().finish())
}

pub(crate) fn username(raw: &str) -> Username {
    Username::new(raw).expect("fixture username")
}

/// Build a test service over `$state` with session support and the
/// `/__session` sign-in route, then register `$service`s.
macro_rules! handler_app {
    ($state:expr $(, $service:expr)* $(,)?) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state)
                .app_data(
                    actix_web::web::JsonConfig::default()
                        .error_handler($crate::inbound::http::error::json_error_handler),
                )
                .wrap($crate::inbound::http::test_utils::test_session_middleware())
                .route(
                    "/__session/{role}/{username}",
                    actix_web::web::post().to($crate::inbound::http::test_utils::sign_in_as),
                )
                $(.service($service))*,
        )
        .await
    };
}

/// Session cookie for `$role`/`$username` obtained from the sign-in route.
macro_rules! signed_in {
    ($app:expr, $role:literal, $username:literal) => {{
        let res = actix_web::test::call_service(
            &$app,
            actix_web::test::TestRequest::post()
                .uri(concat!("/__session/", $role, "/", $username))
                .to_request(),
        )
        .await;
        $crate::inbound::http::test_utils::session_cookie(&res).expect("session cookie")
    }};
}

/// Read a JSON body from a service response.
macro_rules! json_body {
    ($res:expr) => {{
        let body = actix_web::test::read_body($res).await;
        serde_json::from_slice::<serde_json::Value>(&body).expect("json body")
    }};
}

pub(crate) use {handler_app, json_body, signed_in};
