//! Route definitions for the `/surveys` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::surveys;
use crate::state::AppState;

/// ```text
/// GET    /                  -> list_surveys (admin)
/// POST   /                  -> create_survey (admin)
/// GET    /{id}              -> get_survey
/// PUT    /{id}              -> update_survey (admin)
/// DELETE /{id}              -> delete_survey (admin)
/// POST   /{id}/responses    -> submit_response
/// GET    /{id}/responses    -> list_responses (admin)
/// GET    /{id}/results      -> survey_results (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(surveys::list_surveys).post(surveys::create_survey),
        )
        .route(
            "/{id}",
            get(surveys::get_survey)
                .put(surveys::update_survey)
                .delete(surveys::delete_survey),
        )
        .route(
            "/{id}/responses",
            get(surveys::list_responses).post(surveys::submit_response),
        )
        .route("/{id}/results", get(surveys::survey_results))
}
