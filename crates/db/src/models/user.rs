//! User entity model and DTOs.

use muster_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- never serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    /// Resolved role name (e.g. `"admin"`, `"user"`).
    pub role: String,
    pub role_id: DbId,
    pub created_at: Timestamp,
}

/// A user row joined with its role name, used by administrative listings.
#[derive(Debug, Clone, FromRow)]
pub struct UserWithRole {
    pub id: DbId,
    pub email: String,
    pub role_id: DbId,
    pub role_name: String,
    pub created_at: Timestamp,
}

impl From<UserWithRole> for UserResponse {
    fn from(row: UserWithRole) -> Self {
        UserResponse {
            id: row.id,
            email: row.email,
            role: row.role_name,
            role_id: row.role_id,
            created_at: row.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub role_id: DbId,
}
