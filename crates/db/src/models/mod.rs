//! Entity models and DTOs, one submodule per table.

pub mod role;
pub mod role_change;
pub mod survey;
pub mod survey_response;
pub mod unit;
pub mod unit_permission;
pub mod user;
