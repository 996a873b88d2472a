//! Cookie session wrapper resolving the signed-in [`Actor`].
//!
//! A session holds at most one identity: the username under either the
//! `user` or the `admin` key. Logging in clears whatever was there before.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Actor, Error, Role, Username};

pub(crate) const USER_KEY: &str = "user";
pub(crate) const ADMIN_KEY: &str = "admin";

const fn key_for(role: Role) -> &'static str {
    match role {
        Role::User => USER_KEY,
        Role::Admin => ADMIN_KEY,
    }
}

/// Newtype over the actix session exposing identity operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Replace the session contents with `username` signed in as `role`.
    pub fn persist(&self, role: Role, username: &Username) -> Result<(), Error> {
        self.0.clear();
        self.0
            .insert(key_for(role), username.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Sign out of either role.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// The identity stored in the session.
    ///
    /// Missing or malformed entries read as [`Actor::Anonymous`].
    pub fn actor(&self) -> Result<Actor, Error> {
        if let Some(username) = self.username(Role::User)? {
            return Ok(Actor::User(username));
        }
        Ok(self
            .username(Role::Admin)?
            .map_or(Actor::Anonymous, Actor::Admin))
    }

    fn username(&self, role: Role) -> Result<Option<Username>, Error> {
        let raw = self
            .0
            .get::<String>(key_for(role))
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|raw| match Username::new(&raw) {
            Ok(username) => Some(username),
            Err(error) => {
                warn!(%role, %error, "ignoring invalid username in session cookie");
                None
            }
        }))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    use super::*;
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};

    async fn describe(session: SessionContext) -> Result<HttpResponse, Error> {
        let body = match session.actor()? {
            Actor::Anonymous => "anonymous".to_owned(),
            Actor::User(name) => format!("user:{name}"),
            Actor::Admin(name) => format!("admin:{name}"),
        };
        Ok(HttpResponse::Ok().body(body))
    }

    fn ann() -> Username {
        Username::new("ann").expect("fixture username")
    }

    async fn login_user(session: SessionContext) -> Result<HttpResponse, Error> {
        session.persist(Role::User, &ann())?;
        Ok(HttpResponse::Ok().finish())
    }

    async fn login_admin(session: SessionContext) -> Result<HttpResponse, Error> {
        session.persist(Role::Admin, &ann())?;
        Ok(HttpResponse::Ok().finish())
    }

    macro_rules! session_app {
        () => {
            test::init_service(
                App::new()
                    .wrap(test_session_middleware())
                    .route("/user", web::post().to(login_user))
                    .route("/admin", web::post().to(login_admin))
                    .route(
                        "/raw",
                        web::post().to(|session: Session| async move {
                            session.insert(USER_KEY, "   ").expect("insert raw value");
                            HttpResponse::Ok()
                        }),
                    )
                    .route(
                        "/logout",
                        web::post().to(|session: SessionContext| async move {
                            session.clear();
                            HttpResponse::Ok()
                        }),
                    )
                    .route("/whoami", web::get().to(describe)),
            )
            .await
        };
    }

    macro_rules! whoami {
        ($app:expr, $cookie:expr) => {{
            let mut req = test::TestRequest::get().uri("/whoami");
            if let Some(cookie) = $cookie {
                req = req.cookie(cookie);
            }
            let res = test::call_service(&$app, req.to_request()).await;
            assert_eq!(res.status(), StatusCode::OK);
            String::from_utf8(test::read_body(res).await.to_vec()).expect("utf8 body")
        }};
    }

    #[actix_web::test]
    async fn fresh_session_is_anonymous() {
        let app = session_app!();
        assert_eq!(whoami!(app, None::<actix_web::cookie::Cookie<'static>>), "anonymous");
    }

    #[actix_web::test]
    async fn login_replaces_previous_role() {
        let app = session_app!();
        let res =
            test::call_service(&app, test::TestRequest::post().uri("/user").to_request()).await;
        let user_cookie = session_cookie(&res).expect("user cookie");
        assert_eq!(whoami!(app, Some(user_cookie.clone())), "user:ann");

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/admin")
                .cookie(user_cookie)
                .to_request(),
        )
        .await;
        let admin_cookie = session_cookie(&res).expect("admin cookie");
        assert_eq!(whoami!(app, Some(admin_cookie)), "admin:ann");
    }

    #[actix_web::test]
    async fn invalid_username_reads_as_anonymous() {
        let app = session_app!();
        let res =
            test::call_service(&app, test::TestRequest::post().uri("/raw").to_request()).await;
        let cookie = session_cookie(&res).expect("raw cookie");
        assert_eq!(whoami!(app, Some(cookie)), "anonymous");
    }

    #[actix_web::test]
    async fn logout_removes_identity() {
        let app = session_app!();
        let res =
            test::call_service(&app, test::TestRequest::post().uri("/user").to_request()).await;
        let cookie = session_cookie(&res).expect("user cookie");

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let cleared = session_cookie(&res).expect("removal cookie");
        assert_eq!(whoami!(app, Some(cleared)), "anonymous");
    }
}
