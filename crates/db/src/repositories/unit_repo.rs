//! Repository for the `units` table.

use muster_core::types::DbId;
use sqlx::PgPool;

use crate::models::unit::Unit;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, created_at";

/// Provides read operations for units. Creation happens outside the HTTP
/// surface (operators / seed data / tests), so only `create` for those
/// callers plus reads exist here.
pub struct UnitRepo;

impl UnitRepo {
    /// Insert a unit. Not exposed over HTTP; used by operators and tests.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        description: Option<&str>,
    ) -> Result<Unit, sqlx::Error> {
        let query = format!(
            "INSERT INTO units (name, description) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Unit>(&query)
            .bind(name)
            .bind(description)
            .fetch_one(pool)
            .await
    }

    /// Find a unit by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Unit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM units WHERE id = $1");
        sqlx::query_as::<_, Unit>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all units ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Unit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM units ORDER BY name ASC");
        sqlx::query_as::<_, Unit>(&query).fetch_all(pool).await
    }

    /// List the units a user holds a grant for, ordered by name.
    pub async fn list_granted(pool: &PgPool, user_id: DbId) -> Result<Vec<Unit>, sqlx::Error> {
        sqlx::query_as::<_, Unit>(
            "SELECT u.id, u.name, u.description, u.created_at
             FROM units u
             JOIN unit_permissions p ON p.unit_id = u.id
             WHERE p.user_id = $1
             ORDER BY u.name ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
