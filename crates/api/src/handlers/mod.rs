//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers name the operation they perform, route the decision through
//! [`crate::access::AccessControl`], delegate to the corresponding
//! repository in `muster_db`, and map errors via
//! [`crate::error::AppError`].

pub mod auth;
pub mod permissions;
pub mod surveys;
pub mod units;
pub mod users;
