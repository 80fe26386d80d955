//! Pure access-control rules: the role tier of the two-tier check.
//!
//! Resolution is two-tier: the role check short-circuits (admins never hit
//! the permission store), otherwise the operation either requires a unit
//! membership grant or is denied outright. The membership lookup itself
//! lives in the API crate, next to the database; this module stays pure so
//! the rules are testable without a pool.

use serde::Serialize;

use crate::roles::ROLE_ADMIN;

/// An operation on a unit-scoped resource, as named by the handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Create/edit/delete surveys in a unit, administer its permissions.
    ManageUnit,
    /// List the surveys belonging to a unit.
    ViewUnitSurveys,
    /// Read a survey definition in order to answer it.
    ViewSurvey,
    /// Create a response to a survey.
    SubmitResponse,
    /// Read aggregated responses.
    ViewResults,
    /// Create a unit membership grant.
    GrantPermission,
    /// Delete a unit membership grant.
    RevokePermission,
}

/// Outcome of the role tier for one `(role, operation)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleTier {
    /// Allowed on role alone; no membership lookup needed.
    Allowed,
    /// Allowed only if the actor holds a grant for the resource's unit.
    MembershipRequired,
    /// Denied regardless of membership.
    Denied,
}

/// Evaluate the role tier. Admins bypass unit-scoped checks entirely.
pub fn role_tier(role: &str, operation: Operation) -> RoleTier {
    if role == ROLE_ADMIN {
        return RoleTier::Allowed;
    }
    match operation {
        Operation::ViewUnitSurveys | Operation::ViewSurvey | Operation::SubmitResponse => {
            RoleTier::MembershipRequired
        }
        Operation::ManageUnit
        | Operation::ViewResults
        | Operation::GrantPermission
        | Operation::RevokePermission => RoleTier::Denied,
    }
}

/// Resolve the full two-tier decision given the membership answer.
///
/// `has_grant` is only meaningful when the tier is `MembershipRequired`;
/// callers with a tier of `Allowed`/`Denied` never need the lookup.
pub fn is_allowed(role: &str, operation: Operation, has_grant: bool) -> bool {
    match role_tier(role, operation) {
        RoleTier::Allowed => true,
        RoleTier::MembershipRequired => has_grant,
        RoleTier::Denied => false,
    }
}
