//! # Development note
//!
//! We use "" instead of "/" in many places (e.g. `#[get("")]`, etc.)
//! because this allows the user to request e.g. `GET /api/v1/roles` OR `GET /api/v1/roles/` and
//! get the correct endpoint both times.
//!
//! For more information, see `actix_web::middleware::NormalizePath` (trim mode).

pub mod ping;
pub mod roles;

use actix_web::{web, Scope};


/// Router for the entire V1 API.
/// Lives under the `/api/v1` path.
pub fn v1_api_router() -> Scope {
    web::scope("/v1")
        .service(roles::roles_router())
        .service(ping::ping)
}
