pub mod auth;
pub mod jobs;
pub mod mentorship;
pub mod middleware;
pub mod rest;
pub mod state;
pub mod views;

use axum::{
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use placement_core::{Alumni, Company, CoreError, Identity, Status, Student};
use std::sync::Arc;
use tracing::error;

pub use middleware::require_auth;
pub use state::AppState;

/// The error shape every handler returns.
pub type HandlerError = (StatusCode, String);

/// Builds the full HTTP surface. Everything except signup, login, logout and
/// the health check sits behind the session cookie.
pub fn router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/jobs", post(jobs::post_job_handler))
        .route("/jobs/eligible", get(jobs::eligible_jobs_handler))
        .route("/company/jobs", get(jobs::company_jobs_handler))
        .route("/jobs/{id}/apply", post(jobs::apply_handler))
        .route("/jobs/{id}/applicants", get(jobs::applicants_handler))
        .route(
            "/jobs/{id}/ats-scores",
            get(jobs::list_ats_scores_handler).post(jobs::record_ats_score_handler),
        )
        .route("/me/applications", get(jobs::my_applications_handler))
        .route("/applications/{id}/status", post(jobs::decide_application_handler))
        .route("/alumni/mentors", get(mentorship::mentors_handler))
        .route("/alumni/{id}/mentorship", post(mentorship::request_mentorship_handler))
        .route("/mentorship/inbox", get(mentorship::inbox_handler))
        .route("/me/mentorship", get(mentorship::my_requests_handler))
        .route("/mentorship/{id}/status", post(mentorship::decide_mentorship_handler))
        .route("/analytics/summary", get(rest::placement_summary_handler))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(rest::health_handler))
        .route("/auth/signup", post(auth::signup_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected)
        .with_state(state)
}

/// Maps a core failure onto an HTTP status. Store failures are logged and
/// reported without detail.
pub fn reject(err: CoreError) -> HandlerError {
    let status = match &err {
        CoreError::JobNotFound
        | CoreError::AlumniNotFound
        | CoreError::ApplicationNotFound
        | CoreError::RequestNotFound
        | CoreError::StudentNotFound => StatusCode::NOT_FOUND,
        CoreError::DuplicateApplication
        | CoreError::DuplicateRequest
        | CoreError::DuplicateAccount
        | CoreError::InvalidTransition => StatusCode::CONFLICT,
        CoreError::NotAMentor => StatusCode::UNPROCESSABLE_ENTITY,
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::NotOwner => StatusCode::FORBIDDEN,
        CoreError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        CoreError::Port(e) => {
            error!("Store failure: {:?}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            );
        }
    };
    (status, err.to_string())
}

fn wrong_role(expected: &str) -> HandlerError {
    (
        StatusCode::FORBIDDEN,
        format!("Only {} accounts can do this", expected),
    )
}

pub(crate) fn as_student(identity: Identity) -> Result<Student, HandlerError> {
    match identity {
        Identity::Student(student) => Ok(student),
        _ => Err(wrong_role("student")),
    }
}

pub(crate) fn as_company(identity: Identity) -> Result<Company, HandlerError> {
    match identity {
        Identity::Company(company) => Ok(company),
        _ => Err(wrong_role("company")),
    }
}

pub(crate) fn as_alumni(identity: Identity) -> Result<Alumni, HandlerError> {
    match identity {
        Identity::Alumni(alumni) => Ok(alumni),
        _ => Err(wrong_role("alumni")),
    }
}

/// Parses a decision body. Only terminal statuses are accepted here.
pub(crate) fn parse_decision(raw: &str) -> Result<Status, HandlerError> {
    match raw.parse::<Status>() {
        Ok(status) if status.is_resolved() => Ok(status),
        Ok(_) => Err((
            StatusCode::BAD_REQUEST,
            "status must be 'accepted' or 'rejected'".to_string(),
        )),
        Err(e) => Err((StatusCode::BAD_REQUEST, e)),
    }
}
