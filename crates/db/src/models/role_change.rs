//! Role change trail entity model.

use muster_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// One recorded role change, written in the same transaction as the role
/// update itself.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoleChange {
    pub id: DbId,
    pub user_id: DbId,
    pub old_role_id: DbId,
    pub new_role_id: DbId,
    pub changed_by: DbId,
    pub created_at: Timestamp,
}
