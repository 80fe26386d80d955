//! Handlers for the `/units` resource.

use axum::extract::{Path, State};
use axum::Json;
use muster_core::access::Operation;
use muster_core::error::CoreError;
use muster_core::roles::ROLE_ADMIN;
use muster_core::types::DbId;
use muster_db::models::survey::Survey;
use muster_db::models::unit::Unit;
use muster_db::repositories::{SurveyRepo, UnitRepo};

use crate::access::AccessControl;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

/// GET /api/v1/units
///
/// Admins see every unit; plain users see only the units they hold a grant
/// for. This is a listing shape, not an access decision, so it does not go
/// through `AccessControl` (there is no single unit to authorize against).
pub async fn list_units(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<Vec<Unit>>> {
    let units = if user.role == ROLE_ADMIN {
        UnitRepo::list(&state.pool).await?
    } else {
        UnitRepo::list_granted(&state.pool, user.user_id).await?
    };
    Ok(Json(units))
}

/// GET /api/v1/units/{id}
pub async fn get_unit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Unit>> {
    let unit = UnitRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "unit", id }))?;

    AccessControl::authorize(&state.pool, &user, Operation::ViewUnitSurveys, unit.id).await?;

    Ok(Json(unit))
}

/// GET /api/v1/units/{id}/surveys
///
/// List the surveys belonging to a unit, most recently created first.
pub async fn list_unit_surveys(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Survey>>> {
    let unit = UnitRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "unit", id }))?;

    AccessControl::authorize(&state.pool, &user, Operation::ViewUnitSurveys, unit.id).await?;

    let surveys = SurveyRepo::list_by_unit(&state.pool, unit.id).await?;
    Ok(Json(surveys))
}
