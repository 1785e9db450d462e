//! services/api/src/web/rest.rs
//!
//! Contains the health and analytics handlers and the master definition for
//! the OpenAPI specification.

use crate::web::state::AppState;
use crate::web::views::*;
use crate::web::{auth, jobs, mentorship, reject, HandlerError};
use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        placement_summary_handler,
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        jobs::post_job_handler,
        jobs::eligible_jobs_handler,
        jobs::company_jobs_handler,
        jobs::apply_handler,
        jobs::my_applications_handler,
        jobs::applicants_handler,
        jobs::decide_application_handler,
        jobs::record_ats_score_handler,
        jobs::list_ats_scores_handler,
        mentorship::mentors_handler,
        mentorship::request_mentorship_handler,
        mentorship::inbox_handler,
        mentorship::my_requests_handler,
        mentorship::decide_mentorship_handler,
    ),
    components(
        schemas(
            HealthResponse,
            SignupRequest,
            LoginRequest,
            AuthResponse,
            PostJobRequest,
            DecisionRequest,
            MentorshipPayload,
            AtsScoreRequest,
            JobView,
            ApplicationView,
            AppliedJobView,
            StudentView,
            ApplicantView,
            MentorView,
            MentorshipView,
            AtsScoreView,
            PlacementSummaryView
        )
    ),
    tags(
        (name = "Placement Portal API", description = "Job postings, applications, mentorship and placement analytics.")
    )
)]
pub struct ApiDoc;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Liveness check.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /analytics/summary - Placement statistics across the whole portal
#[utoipa::path(
    get,
    path = "/analytics/summary",
    responses(
        (status = 200, description = "Current placement summary", body = PlacementSummaryView),
        (status = 401, description = "Not logged in"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn placement_summary_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<PlacementSummaryView>, HandlerError> {
    let summary = app_state
        .analytics
        .placement_summary()
        .await
        .map_err(reject)?;
    Ok(Json(summary.into()))
}
