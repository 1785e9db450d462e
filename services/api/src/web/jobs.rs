//! services/api/src/web/jobs.rs
//!
//! Job board endpoints: posting, eligibility, applications and ATS scores.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use placement_core::Identity;
use std::sync::Arc;
use uuid::Uuid;

use crate::web::state::AppState;
use crate::web::views::{
    ApplicantView, ApplicationView, AppliedJobView, AtsScoreRequest, AtsScoreView,
    DecisionRequest, JobView, PostJobRequest,
};
use crate::web::{as_company, as_student, parse_decision, reject, HandlerError};

/// POST /jobs - Post a new job and notify eligible students
#[utoipa::path(
    post,
    path = "/jobs",
    request_body = PostJobRequest,
    responses(
        (status = 201, description = "Job posted", body = JobView),
        (status = 400, description = "Invalid job details"),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Caller is not a company")
    )
)]
pub async fn post_job_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<PostJobRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let company = as_company(identity)?;
    let job = state
        .job_board
        .post_job(&company, req.into())
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(JobView::from(job))))
}

/// GET /jobs/eligible - Jobs the calling student qualifies for
#[utoipa::path(
    get,
    path = "/jobs/eligible",
    responses(
        (status = 200, description = "Eligible jobs, oldest first", body = [JobView]),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Caller is not a student")
    )
)]
pub async fn eligible_jobs_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<JobView>>, HandlerError> {
    let student = as_student(identity)?;
    let jobs = state.matcher.eligible_jobs(&student).await.map_err(reject)?;
    Ok(Json(jobs.into_iter().map(JobView::from).collect()))
}

/// GET /company/jobs - Jobs posted by the calling company
#[utoipa::path(
    get,
    path = "/company/jobs",
    responses(
        (status = 200, description = "The company's jobs", body = [JobView]),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Caller is not a company")
    )
)]
pub async fn company_jobs_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<JobView>>, HandlerError> {
    let company = as_company(identity)?;
    let jobs = state
        .job_board
        .jobs_for_company(&company)
        .await
        .map_err(reject)?;
    Ok(Json(jobs.into_iter().map(JobView::from).collect()))
}

/// POST /jobs/{id}/apply - Apply to a job
#[utoipa::path(
    post,
    path = "/jobs/{id}/apply",
    params(("id" = Uuid, Path, description = "Job id")),
    responses(
        (status = 201, description = "Application submitted", body = ApplicationView),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Already applied")
    )
)]
pub async fn apply_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    let student = as_student(identity)?;
    let application = state
        .applications
        .apply_to_job(&student, job_id)
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(ApplicationView::from(application))))
}

/// GET /me/applications - The calling student's applications with their jobs
#[utoipa::path(
    get,
    path = "/me/applications",
    responses(
        (status = 200, description = "Applications in the order they were made", body = [AppliedJobView]),
        (status = 403, description = "Caller is not a student")
    )
)]
pub async fn my_applications_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<AppliedJobView>>, HandlerError> {
    let student = as_student(identity)?;
    let rows = state
        .applications
        .applications_for_student(&student)
        .await
        .map_err(reject)?;
    Ok(Json(
        rows.into_iter()
            .map(|(application, job)| AppliedJobView {
                application: application.into(),
                job: job.into(),
            })
            .collect(),
    ))
}

/// GET /jobs/{id}/applicants - Applicants for one of the calling company's jobs
#[utoipa::path(
    get,
    path = "/jobs/{id}/applicants",
    params(("id" = Uuid, Path, description = "Job id")),
    responses(
        (status = 200, description = "Applicants with their applications", body = [ApplicantView]),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Job not found")
    )
)]
pub async fn applicants_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<ApplicantView>>, HandlerError> {
    let company = as_company(identity)?;
    let applicants = state
        .applications
        .applicants_for_job(&company, job_id)
        .await
        .map_err(reject)?;
    Ok(Json(applicants.into_iter().map(ApplicantView::from).collect()))
}

/// POST /applications/{id}/status - Accept or reject a pending application
#[utoipa::path(
    post,
    path = "/applications/{id}/status",
    params(("id" = Uuid, Path, description = "Application id")),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Application updated", body = ApplicationView),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Application not found"),
        (status = 409, description = "Application already decided")
    )
)]
pub async fn decide_application_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(application_id): Path<Uuid>,
    Json(req): Json<DecisionRequest>,
) -> Result<Json<ApplicationView>, HandlerError> {
    let company = as_company(identity)?;
    let to = parse_decision(&req.status)?;
    let application = state
        .applications
        .decide_application(&company, application_id, to)
        .await
        .map_err(reject)?;
    Ok(Json(application.into()))
}

/// POST /jobs/{id}/ats-scores - Record a resume screening score for an applicant
#[utoipa::path(
    post,
    path = "/jobs/{id}/ats-scores",
    params(("id" = Uuid, Path, description = "Job id")),
    request_body = AtsScoreRequest,
    responses(
        (status = 201, description = "Score recorded", body = AtsScoreView),
        (status = 400, description = "Score outside 0-100"),
        (status = 404, description = "Job, student or application not found")
    )
)]
pub async fn record_ats_score_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<AtsScoreRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let company = as_company(identity)?;
    let score = state
        .applications
        .record_ats_score(&company, job_id, req.student_id, req.score, req.feedback)
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(AtsScoreView::from(score))))
}

/// GET /jobs/{id}/ats-scores - Screening scores recorded for a job
#[utoipa::path(
    get,
    path = "/jobs/{id}/ats-scores",
    params(("id" = Uuid, Path, description = "Job id")),
    responses(
        (status = 200, description = "Recorded scores", body = [AtsScoreView]),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Job not found")
    )
)]
pub async fn list_ats_scores_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<AtsScoreView>>, HandlerError> {
    let company = as_company(identity)?;
    let scores = state
        .applications
        .ats_scores_for_job(&company, job_id)
        .await
        .map_err(reject)?;
    Ok(Json(scores.into_iter().map(AtsScoreView::from).collect()))
}
