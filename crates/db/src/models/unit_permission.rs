//! Unit permission (membership grant) entity model.

use muster_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A grant row from the `unit_permissions` table: this user may act within
/// this unit. At most one row exists per `(user_id, unit_id)` pair.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UnitPermission {
    pub id: DbId,
    pub user_id: DbId,
    pub unit_id: DbId,
    pub created_at: Timestamp,
}

/// Optional filters for administrative grant listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrantFilter {
    pub user_id: Option<DbId>,
    pub unit_id: Option<DbId>,
}
