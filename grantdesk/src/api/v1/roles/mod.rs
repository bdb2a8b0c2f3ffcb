use actix_web::{web, Scope};

pub mod endpoints;


/// Router for role grant management.
/// Lives under the `/api/v1/roles` path.
pub fn roles_router() -> Scope {
    web::scope("/roles")
        .service(endpoints::get_role_permission_tree)
        .service(endpoints::replace_role_grants)
}
