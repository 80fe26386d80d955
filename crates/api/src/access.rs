//! The access-control component: one decision function for every
//! unit-scoped operation.
//!
//! Handlers never check roles or grants inline; they name the operation and
//! call [`AccessControl::authorize`]. The role tier
//! (`muster_core::access::role_tier`) short-circuits for admins, so the
//! permission store is only consulted for plain users on view/submit
//! operations.

use muster_core::access::{role_tier, Operation, RoleTier};
use muster_core::error::CoreError;
use muster_core::types::DbId;
use muster_db::repositories::PermissionRepo;
use muster_db::DbPool;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;

pub struct AccessControl;

impl AccessControl {
    /// Allow or deny `operation` on the unit-scoped resource identified by
    /// `unit_id`, for the given authenticated actor.
    ///
    /// Denials surface verbatim as 403 `Forbidden`; they are never
    /// downgraded or absorbed. The unauthenticated case cannot reach here:
    /// constructing an [`AuthUser`] already rejected it with 401.
    pub async fn authorize(
        pool: &DbPool,
        actor: &AuthUser,
        operation: Operation,
        unit_id: DbId,
    ) -> Result<(), AppError> {
        match role_tier(&actor.role, operation) {
            RoleTier::Allowed => Ok(()),
            RoleTier::Denied => {
                tracing::debug!(
                    user_id = actor.user_id,
                    role = %actor.role,
                    ?operation,
                    unit_id,
                    "access denied by role"
                );
                Err(forbidden(operation))
            }
            RoleTier::MembershipRequired => {
                if PermissionRepo::has_grant(pool, actor.user_id, unit_id).await? {
                    Ok(())
                } else {
                    tracing::debug!(
                        user_id = actor.user_id,
                        ?operation,
                        unit_id,
                        "access denied: no grant for unit"
                    );
                    Err(forbidden(operation))
                }
            }
        }
    }
}

fn forbidden(operation: Operation) -> AppError {
    let message = match operation {
        Operation::ManageUnit => "Managing this unit requires the admin role",
        Operation::ViewUnitSurveys | Operation::ViewSurvey => {
            "You do not have access to this unit's surveys"
        }
        Operation::SubmitResponse => "You do not have access to answer this survey",
        Operation::ViewResults => "Viewing results requires the admin role",
        Operation::GrantPermission | Operation::RevokePermission => {
            "Managing permissions requires the admin role"
        }
    };
    AppError::Core(CoreError::Forbidden(message.into()))
}
