//! Handlers for the `/admin/users` resource (listing, role management).

use axum::extract::{Path, State};
use axum::Json;
use muster_core::error::CoreError;
use muster_core::types::DbId;
use muster_db::models::role_change::RoleChange;
use muster_db::models::user::UserResponse;
use muster_db::repositories::{RoleRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Request body for `PUT /admin/users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    /// Role name, e.g. `"admin"` or `"user"`.
    pub role: String,
}

/// GET /api/v1/admin/users
///
/// List all users with resolved role names, most recently created first.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list_with_roles(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// PUT /api/v1/admin/users/{id}/role
///
/// Change a user's role. The update and its RoleChange record are written
/// in one transaction, so the trail cannot miss a change. The admin's own
/// token keeps its old role claim until their next login; the authoritative
/// role lives in the database.
pub async fn update_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRoleRequest>,
) -> AppResult<Json<RoleChange>> {
    let role = RoleRepo::find_by_name(&state.pool, &input.role)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Unknown role '{}'",
                input.role
            )))
        })?;

    let change = UserRepo::update_role(&state.pool, id, role.id, admin.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "user", id }))?;

    tracing::info!(
        user_id = id,
        new_role = %input.role,
        changed_by = admin.user_id,
        "updated user role"
    );

    Ok(Json(change))
}

/// GET /api/v1/admin/users/{id}/role-changes
///
/// The user's role change trail, most recent first.
pub async fn list_role_changes(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<RoleChange>>> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "user", id }))?;

    let changes = UserRepo::list_role_changes(&state.pool, id).await?;
    Ok(Json(changes))
}
