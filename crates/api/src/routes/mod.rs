pub mod admin;
pub mod auth;
pub mod health;
pub mod surveys;
pub mod units;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                       register (public)
/// /auth/login                          login (public)
/// /auth/me                             identity echo (requires auth)
///
/// /units                               list (auth; scoped by grants)
/// /units/{id}                          get (auth + unit access)
/// /units/{id}/surveys                  unit's surveys (auth + unit access)
///
/// /surveys                             list (admin), create (admin)
/// /surveys/{id}                        get (auth + unit access), update, delete (admin)
/// /surveys/{id}/responses              submit (auth + unit access), list (admin)
/// /surveys/{id}/results                aggregated report (admin)
///
/// /admin/permissions                   list, grant (admin only)
/// /admin/permissions/{id}              revoke
/// /admin/users                         list (admin only)
/// /admin/users/{id}/role               update role
/// /admin/users/{id}/role-changes       role change trail
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/units", units::router())
        .nest("/surveys", surveys::router())
        .nest("/admin", admin::router())
}
