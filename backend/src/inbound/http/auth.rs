//! Authentication endpoints dispatched on the `action` query parameter.
//!
//! ```text
//! POST /auth?action=login     {"email":"..","password":".."}
//! POST /auth?action=register  {"full_name":"..","username":"..","email":"..","password":".."}
//! GET  /auth?action=verify    Authorization: Bearer <token>
//! ```

use actix_web::http::header::AUTHORIZATION;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Error, LoginCredentials, Registration, RegistrationParts, User, ports::AuthSession,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    map_login_error, map_registration_error, non_blank, parse_body,
};

const INVALID_ACTION: &str = "Invalid action";

/// Query string selecting the authentication action.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ActionQuery {
    /// `login`, `register` or `verify`.
    pub action: Option<String>,
}

impl ActionQuery {
    pub(crate) fn action(&self) -> Option<&str> {
        non_blank(self.action.as_deref())
    }
}

pub(crate) fn invalid_action() -> Error {
    Error::invalid_request(INVALID_ACTION)
}

/// Login request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub department: Option<String>,
    pub phone: Option<String>,
}

impl TryFrom<&RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: &RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(RegistrationParts {
            full_name: &value.full_name,
            username: &value.username,
            email: &value.email,
            password: &value.password,
            department: value.department.as_deref(),
            phone: value.phone.as_deref(),
        })
        .map_err(|err| map_registration_error(&err))
    }
}

/// Successful login or registration.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub success: bool,
    pub token: String,
    pub user: User,
}

impl From<AuthSession> for SessionResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            success: true,
            token: session.token,
            user: session.user,
        }
    }
}

/// Profile of a verified token.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: User,
}

/// Log in or register, depending on `action`.
#[utoipa::path(
    post,
    path = "/auth",
    params(ActionQuery),
    request_body(
        content = RegisterRequest,
        description = "`LoginRequest` for `action=login`, `RegisterRequest` for `action=register`"
    ),
    responses(
        (status = 200, description = "Token issued", body = SessionResponse),
        (status = 400, description = "Invalid action, invalid body or user already exists", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "authenticate",
    security([])
)]
pub async fn auth_post(
    state: web::Data<HttpState>,
    query: web::Query<ActionQuery>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let session = match query.action() {
        Some("login") => {
            let request: LoginRequest = parse_body(&body)?;
            let credentials = LoginCredentials::try_from_parts(&request.email, &request.password)
                .map_err(|err| map_login_error(&err))?;
            state.accounts.login(&credentials).await?
        }
        Some("register") => {
            let request: RegisterRequest = parse_body(&body)?;
            let registration = Registration::try_from(&request)?;
            state.accounts.register(registration).await?
        }
        _ => return Err(invalid_action()),
    };
    Ok(HttpResponse::Ok().json(SessionResponse::from(session)))
}

/// Return the profile named by the bearer token.
#[utoipa::path(
    get,
    path = "/auth",
    params(ActionQuery),
    responses(
        (status = 200, description = "Token is valid", body = ProfileResponse),
        (status = 400, description = "Invalid action", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["auth"],
    operation_id = "verifyToken"
)]
pub async fn auth_get(
    state: web::Data<HttpState>,
    query: web::Query<ActionQuery>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    if query.action() != Some("verify") {
        return Err(invalid_action());
    }
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let user = state
        .identity
        .resolve(header)
        .await?
        .ok_or_else(|| Error::unauthorized("Invalid token"))?;
    Ok(HttpResponse::Ok().json(ProfileResponse {
        success: true,
        user,
    }))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
