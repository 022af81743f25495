//! Request extractor that resolves the caller from the bearer token.
//!
//! Handlers that take [`AuthenticatedUser`] never run for anonymous callers:
//! a missing, malformed, expired or unknown token is answered with
//! `401 Unauthorized` before the handler body executes.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, User};
use crate::inbound::http::state::HttpState;

const UNAUTHORIZED: &str = "Unauthorized";

/// The user named by a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn user(&self) -> &User {
        &self.0
    }

    pub fn into_inner(self) -> User {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state is not registered"))?;
            state
                .identity
                .resolve(header.as_deref())
                .await?
                .map(Self)
                .ok_or_else(|| Error::unauthorized(UNAUTHORIZED))
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::test_utils::TestContext;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    async fn whoami(caller: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(caller.user().username().as_str().to_owned())
    }

    #[rstest]
    #[actix_web::test]
    async fn valid_token_reaches_handler() {
        let ctx = TestContext::new();
        let (_, bearer) = ctx.seed_user("tess", Role::Technician).await;
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(ctx.state()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/whoami")
                .insert_header((AUTHORIZATION, bearer))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(actix_test::read_body(res).await, "tess");
    }

    #[rstest]
    #[case::missing(None)]
    #[case::wrong_scheme(Some("Basic dGVzczpwdw=="))]
    #[case::forged(Some("Bearer eyJhbGciOiJIUzI1NiJ9.e30.c2ln"))]
    #[actix_web::test]
    async fn anonymous_callers_are_rejected(#[case] header: Option<&str>) {
        let ctx = TestContext::new();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(ctx.state()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let mut req = actix_test::TestRequest::get().uri("/whoami");
        if let Some(value) = header {
            req = req.insert_header((AUTHORIZATION, value));
        }
        let res = actix_test::call_service(&app, req.to_request()).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["error"], "Unauthorized");
        assert_eq!(body["success"], false);
    }

    #[rstest]
    #[actix_web::test]
    async fn token_for_deleted_user_is_rejected() {
        let ctx = TestContext::new();
        let bearer = ctx.bearer_for(crate::domain::UserId::random());
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(ctx.state()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/whoami")
                .insert_header((AUTHORIZATION, bearer))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
