//! Repositories, one per table. All methods take the pool (or a
//! transaction) explicitly; repositories hold no state.

mod permission_repo;
mod response_repo;
mod role_repo;
mod survey_repo;
mod unit_repo;
mod user_repo;

pub use permission_repo::PermissionRepo;
pub use response_repo::ResponseRepo;
pub use role_repo::RoleRepo;
pub use survey_repo::SurveyRepo;
pub use unit_repo::UnitRepo;
pub use user_repo::UserRepo;
