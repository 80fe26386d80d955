//! Repository for the `users` table.

use muster_core::types::DbId;
use sqlx::PgPool;

use crate::models::role_change::RoleChange;
use crate::models::user::{CreateUser, User, UserWithRole};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, role_id, created_at, updated_at";

/// Joined column list for listings that need the role name.
const JOINED_COLUMNS: &str =
    "u.id, u.email, u.role_id, r.name AS role_name, u.created_at";

/// Provides CRUD operations for users plus the transactional role update.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// Duplicate emails violate `uq_users_email` and surface as a database
    /// error the API maps to 409.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, password_hash, role_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role_id)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all users with their role names, most recently created first.
    pub async fn list_with_roles(pool: &PgPool) -> Result<Vec<UserWithRole>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM users u
             JOIN roles r ON r.id = u.role_id
             ORDER BY u.created_at DESC"
        );
        sqlx::query_as::<_, UserWithRole>(&query)
            .fetch_all(pool)
            .await
    }

    /// Change a user's role and record the change, in one transaction.
    ///
    /// Returns `None` if the user does not exist. A no-op update (same role)
    /// still records a change row so the trail shows the attempt.
    pub async fn update_role(
        pool: &PgPool,
        user_id: DbId,
        new_role_id: DbId,
        changed_by: DbId,
    ) -> Result<Option<RoleChange>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let old_role_id: Option<DbId> =
            sqlx::query_scalar("SELECT role_id FROM users WHERE id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(old_role_id) = old_role_id else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("UPDATE users SET role_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(new_role_id)
            .execute(&mut *tx)
            .await?;

        let change = sqlx::query_as::<_, RoleChange>(
            "INSERT INTO role_changes (user_id, old_role_id, new_role_id, changed_by)
             VALUES ($1, $2, $3, $4)
             RETURNING id, user_id, old_role_id, new_role_id, changed_by, created_at",
        )
        .bind(user_id)
        .bind(old_role_id)
        .bind(new_role_id)
        .bind(changed_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(
            user_id,
            old_role_id,
            new_role_id,
            change_id = change.id,
            "role change committed"
        );
        Ok(Some(change))
    }

    /// List a user's role changes, most recent first.
    pub async fn list_role_changes(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<RoleChange>, sqlx::Error> {
        sqlx::query_as::<_, RoleChange>(
            "SELECT id, user_id, old_role_id, new_role_id, changed_by, created_at
             FROM role_changes WHERE user_id = $1
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
