//! Route definitions for the `/admin` resource tree.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::{permissions, users};
use crate::state::AppState;

/// ```text
/// GET    /permissions                   -> list_grants
/// POST   /permissions                   -> grant_permission
/// DELETE /permissions/{id}              -> revoke_permission
/// GET    /users                         -> list_users
/// PUT    /users/{id}/role               -> update_role
/// GET    /users/{id}/role-changes       -> list_role_changes
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/permissions",
            get(permissions::list_grants).post(permissions::grant_permission),
        )
        .route("/permissions/{id}", delete(permissions::revoke_permission))
        .route("/users", get(users::list_users))
        .route("/users/{id}/role", put(users::update_role))
        .route("/users/{id}/role-changes", get(users::list_role_changes))
}
