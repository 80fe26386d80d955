//! Repository for the `unit_permissions` table: the membership oracle.

use muster_core::types::DbId;
use sqlx::PgPool;

use crate::models::unit_permission::{GrantFilter, UnitPermission};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, unit_id, created_at";

/// Provides grant/revoke/lookup operations for unit membership.
pub struct PermissionRepo;

impl PermissionRepo {
    /// Insert a grant, returning the created row.
    ///
    /// Duplicate `(user_id, unit_id)` pairs violate
    /// `uq_unit_permissions_user_unit`; the constraint is what resolves a
    /// race between concurrent duplicate grants. Callers pre-check with
    /// [`PermissionRepo::has_grant`] only to give a friendly error early.
    pub async fn grant(
        pool: &PgPool,
        user_id: DbId,
        unit_id: DbId,
    ) -> Result<UnitPermission, sqlx::Error> {
        let query = format!(
            "INSERT INTO unit_permissions (user_id, unit_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UnitPermission>(&query)
            .bind(user_id)
            .bind(unit_id)
            .fetch_one(pool)
            .await
    }

    /// Delete a grant by ID. Returns `true` if a row was deleted.
    pub async fn revoke(pool: &PgPool, permission_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM unit_permissions WHERE id = $1")
            .bind(permission_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Pure membership query: does a grant exist for this user and unit?
    pub async fn has_grant(
        pool: &PgPool,
        user_id: DbId,
        unit_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM unit_permissions WHERE user_id = $1 AND unit_id = $2)",
        )
        .bind(user_id)
        .bind(unit_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// List grants matching the filter, most recently created first.
    pub async fn list(
        pool: &PgPool,
        filter: GrantFilter,
    ) -> Result<Vec<UnitPermission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM unit_permissions
             WHERE ($1::BIGINT IS NULL OR user_id = $1)
               AND ($2::BIGINT IS NULL OR unit_id = $2)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, UnitPermission>(&query)
            .bind(filter.user_id)
            .bind(filter.unit_id)
            .fetch_all(pool)
            .await
    }
}
