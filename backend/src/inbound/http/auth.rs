//! Signup, login and logout for both roles.
//!
//! ```text
//! POST /signup        {"username":"ann","password":"pw"}
//! POST /login         {"username":"ann","password":"pw"}
//! GET|POST /logout
//! POST /admin/signup, POST /admin/login, GET|POST /admin/logout
//! ```

use actix_web::{HttpResponse, post, route, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_credentials;
use crate::inbound::http::views::AccountView;

/// Credentials body shared by every signup and login endpoint.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    #[schema(example = "ann")]
    pub username: String,
    #[schema(example = "s3cret")]
    pub password: String,
}

async fn sign_up(
    state: &HttpState,
    role: Role,
    payload: CredentialsRequest,
) -> ApiResult<HttpResponse> {
    let credentials = parse_credentials(&payload.username, &payload.password)?;
    let username = state.identity.sign_up(role, &credentials).await?;
    Ok(HttpResponse::Created().json(AccountView::new(role, &username)))
}

async fn log_in(
    state: &HttpState,
    session: &SessionContext,
    role: Role,
    payload: CredentialsRequest,
) -> ApiResult<web::Json<AccountView>> {
    let credentials = parse_credentials(&payload.username, &payload.password)?;
    let username = state.identity.log_in(role, &credentials).await?;
    session.persist(role, &username)?;
    Ok(web::Json(AccountView::new(role, &username)))
}

fn log_out(session: &SessionContext) -> HttpResponse {
    if let Ok(actor) = session.actor() {
        info!(?actor, "signed out");
    }
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Register a donor/requester account.
#[utoipa::path(
    post,
    path = "/signup",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = AccountView),
        (status = 400, description = "Invalid credentials shape", body = Error),
        (status = 409, description = "Username taken", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signupUser",
    security([])
)]
#[post("/signup")]
pub async fn signup_user(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    sign_up(&state, Role::User, payload.into_inner()).await
}

/// Authenticate a user and start a session.
#[utoipa::path(
    post,
    path = "/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Signed in", body = AccountView,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid credentials shape", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["auth"],
    operation_id = "loginUser",
    security([])
)]
#[post("/login")]
pub async fn login_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<AccountView>> {
    log_in(&state, &session, Role::User, payload.into_inner()).await
}

/// End the current session.
#[utoipa::path(
    method(get, post),
    path = "/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["auth"],
    operation_id = "logoutUser"
)]
#[route("/logout", method = "GET", method = "POST")]
pub async fn logout_user(session: SessionContext) -> HttpResponse {
    log_out(&session)
}

/// Register an administrator account.
#[utoipa::path(
    post,
    path = "/admin/signup",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Admin created", body = AccountView),
        (status = 400, description = "Invalid credentials shape", body = Error),
        (status = 409, description = "Username taken", body = Error)
    ),
    tags = ["admin"],
    operation_id = "signupAdmin",
    security([])
)]
#[post("/admin/signup")]
pub async fn signup_admin(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    sign_up(&state, Role::Admin, payload.into_inner()).await
}

/// Authenticate an administrator and start a session.
#[utoipa::path(
    post,
    path = "/admin/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Signed in", body = AccountView),
        (status = 400, description = "Invalid credentials shape", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["admin"],
    operation_id = "loginAdmin",
    security([])
)]
#[post("/admin/login")]
pub async fn login_admin(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<AccountView>> {
    log_in(&state, &session, Role::Admin, payload.into_inner()).await
}

#[utoipa::path(
    method(get, post),
    path = "/admin/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["admin"],
    operation_id = "logoutAdmin"
)]
#[route("/admin/logout", method = "GET", method = "POST")]
pub async fn logout_admin(session: SessionContext) -> HttpResponse {
    log_out(&session)
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::{Credentials, Username};
    use crate::inbound::http::test_utils::{MockPorts, handler_app, json_body, session_cookie};

    fn body(username: &str, password: &str) -> serde_json::Value {
        json!({ "username": username, "password": password })
    }

    #[rstest]
    #[case("/signup", Role::User)]
    #[case("/admin/signup", Role::Admin)]
    #[actix_web::test]
    async fn signup_creates_account_for_role(#[case] uri: &str, #[case] role: Role) {
        let mut ports = MockPorts::default();
        ports
            .identity
            .expect_sign_up()
            .withf(move |r, creds: &Credentials| *r == role && creds.username().as_ref() == "ann")
            .times(1)
            .returning(|_, creds| Ok(creds.username().clone()));
        let app = handler_app!(ports.into_state(), signup_user, signup_admin);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(uri)
                .set_json(body(" ann ", "pw"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        assert!(session_cookie(&res).is_none());
        let value = json_body!(res);
        assert_eq!(value, json!({ "username": "ann", "role": role.to_string() }));
    }

    #[rstest]
    #[case(" ", "pw", "empty_username")]
    #[case("ann", "", "empty_password")]
    #[actix_web::test]
    async fn signup_validates_before_calling_port(
        #[case] username: &str,
        #[case] password: &str,
        #[case] code: &str,
    ) {
        let mut ports = MockPorts::default();
        ports.identity.expect_sign_up().times(0);
        let app = handler_app!(ports.into_state(), signup_user);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/signup")
                .set_json(body(username, password))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value = json_body!(res);
        assert_eq!(value["details"]["code"], json!(code));
    }

    #[actix_web::test]
    async fn duplicate_signup_is_conflict() {
        let mut ports = MockPorts::default();
        ports
            .identity
            .expect_sign_up()
            .returning(|_, _| Err(Error::conflict("user account ann already exists")));
        let app = handler_app!(ports.into_state(), signup_user);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/signup")
                .set_json(body("ann", "pw"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CONFLICT);
        assert_eq!(json_body!(res)["code"], json!("conflict"));
    }

    #[actix_web::test]
    async fn login_sets_session_cookie() {
        let mut ports = MockPorts::default();
        ports
            .identity
            .expect_log_in()
            .withf(|role, _| *role == Role::Admin)
            .returning(|_, _| Ok(Username::new("root").expect("username")));
        let app = handler_app!(ports.into_state(), login_admin);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/admin/login")
                .set_json(body("root", "pw"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(session_cookie(&res).is_some());
        assert_eq!(json_body!(res)["role"], json!("admin"));
    }

    #[actix_web::test]
    async fn rejected_login_sets_no_cookie() {
        let mut ports = MockPorts::default();
        ports
            .identity
            .expect_log_in()
            .returning(|_, _| Err(Error::unauthorized("invalid credentials")));
        let app = handler_app!(ports.into_state(), login_user);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/login")
                .set_json(body("ann", "nope"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(session_cookie(&res).is_none());
        assert_eq!(json_body!(res)["code"], json!("unauthorized"));
    }

    #[rstest]
    #[case("/logout")]
    #[case("/admin/logout")]
    #[actix_web::test]
    async fn logout_accepts_get_without_session(#[case] uri: &str) {
        let app = handler_app!(MockPorts::default().into_state(), logout_user, logout_admin);
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }
}
