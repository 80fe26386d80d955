//! Handlers for the `/admin/permissions` resource (unit membership grants).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use muster_core::access::Operation;
use muster_core::error::CoreError;
use muster_core::types::DbId;
use muster_db::models::unit_permission::{GrantFilter, UnitPermission};
use muster_db::repositories::{PermissionRepo, UnitRepo, UserRepo};
use serde::Deserialize;

use crate::access::AccessControl;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Query parameters for `GET /admin/permissions`.
#[derive(Debug, Deserialize)]
pub struct ListGrantsQuery {
    pub user_id: Option<DbId>,
    pub unit_id: Option<DbId>,
}

/// Request body for `POST /admin/permissions`.
#[derive(Debug, Deserialize)]
pub struct GrantRequest {
    pub user_id: DbId,
    pub unit_id: DbId,
}

/// GET /api/v1/admin/permissions
///
/// List grants, optionally filtered by user and/or unit, most recent first.
pub async fn list_grants(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Query(query): Query<ListGrantsQuery>,
) -> AppResult<Json<Vec<UnitPermission>>> {
    let grants = PermissionRepo::list(
        &state.pool,
        GrantFilter {
            user_id: query.user_id,
            unit_id: query.unit_id,
        },
    )
    .await?;
    Ok(Json(grants))
}

/// POST /api/v1/admin/permissions
///
/// Grant a user access to a unit. Duplicate grants are a 409; the unique
/// constraint settles concurrent duplicates.
pub async fn grant_permission(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<GrantRequest>,
) -> AppResult<(StatusCode, Json<UnitPermission>)> {
    AccessControl::authorize(&state.pool, &admin, Operation::GrantPermission, input.unit_id)
        .await?;

    UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: input.user_id,
        }))?;
    UnitRepo::find_by_id(&state.pool, input.unit_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "unit",
            id: input.unit_id,
        }))?;

    if PermissionRepo::has_grant(&state.pool, input.user_id, input.unit_id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "This user already holds a grant for this unit".into(),
        )));
    }

    let grant = PermissionRepo::grant(&state.pool, input.user_id, input.unit_id).await?;
    tracing::info!(
        grant_id = grant.id,
        user_id = grant.user_id,
        unit_id = grant.unit_id,
        granted_by = admin.user_id,
        "granted unit permission"
    );

    Ok((StatusCode::CREATED, Json(grant)))
}

/// DELETE /api/v1/admin/permissions/{id}
///
/// Revoke a grant by ID. 404 if the grant does not exist.
pub async fn revoke_permission(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = PermissionRepo::revoke(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "permission",
            id,
        }));
    }

    tracing::info!(grant_id = id, revoked_by = admin.user_id, "revoked unit permission");
    Ok(StatusCode::NO_CONTENT)
}
