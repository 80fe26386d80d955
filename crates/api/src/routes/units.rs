//! Route definitions for the `/units` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::units;
use crate::state::AppState;

/// ```text
/// GET /                 -> list_units
/// GET /{id}             -> get_unit
/// GET /{id}/surveys     -> list_unit_surveys
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(units::list_units))
        .route("/{id}", get(units::get_unit))
        .route("/{id}/surveys", get(units::list_unit_surveys))
}
