//! HTTP inbound adapter exposing the REST endpoints.
//!
//! Three resources share one dispatch shape: the method plus an optional
//! `action` query parameter select the operation. [`configure`] registers
//! them; health probes and API docs are mounted by the server.

use actix_web::web;

pub mod admin;
pub mod auth;
pub mod complaints;
pub mod error;
pub mod health;
pub mod identity;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod token_config;
pub mod validation;

pub use crate::domain::ApiResult;

use crate::domain::Error;

/// Fallback for methods a resource does not serve.
async fn method_not_allowed() -> ApiResult<web::Json<()>> {
    Err(Error::method_not_allowed("Method not allowed"))
}

/// Register the `/auth`, `/complaints` and `/admin` resources.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use complaint_desk::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/auth")
            .route(web::post().to(auth::auth_post))
            .route(web::get().to(auth::auth_get))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/complaints")
            .route(web::get().to(complaints::get_complaints))
            .route(web::post().to(complaints::create_complaint))
            .route(web::put().to(complaints::update_complaint))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/admin")
            .route(web::get().to(admin::admin_get))
            .route(web::post().to(admin::admin_post))
            .default_service(web::to(method_not_allowed)),
    );
}
