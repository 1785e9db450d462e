//! services/api/src/web/mentorship.rs
//!
//! Mentor network endpoints shared by students and alumni.

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
use crate::web::views::{DecisionRequest, MentorView, MentorshipPayload, MentorshipView};
use crate::web::{as_alumni, as_student, parse_decision, reject, HandlerError};

/// GET /alumni/mentors - Alumni currently accepting mentorship requests
#[utoipa::path(
    get,
    path = "/alumni/mentors",
    responses(
        (status = 200, description = "Available mentors", body = [MentorView]),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn mentors_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MentorView>>, HandlerError> {
    let mentors = state.applications.list_mentors().await.map_err(reject)?;
    Ok(Json(mentors.into_iter().map(MentorView::from).collect()))
}

/// POST /alumni/{id}/mentorship - Ask an alumni for mentorship
#[utoipa::path(
    post,
    path = "/alumni/{id}/mentorship",
    params(("id" = Uuid, Path, description = "Alumni id")),
    request_body = MentorshipPayload,
    responses(
        (status = 201, description = "Request sent", body = MentorshipView),
        (status = 404, description = "Alumni not found"),
        (status = 409, description = "Already requested"),
        (status = 422, description = "Alumni is not a mentor")
    )
)]
pub async fn request_mentorship_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(alumni_id): Path<Uuid>,
    Json(payload): Json<MentorshipPayload>,
) -> Result<impl IntoResponse, HandlerError> {
    let student = as_student(identity)?;
    let request = state
        .applications
        .request_mentorship(&student, alumni_id, payload.message)
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(MentorshipView::from(request))))
}

/// GET /mentorship/inbox - Requests addressed to the calling alumni
#[utoipa::path(
    get,
    path = "/mentorship/inbox",
    responses(
        (status = 200, description = "Incoming requests", body = [MentorshipView]),
        (status = 403, description = "Caller is not an alumni")
    )
)]
pub async fn inbox_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<MentorshipView>>, HandlerError> {
    let alumni = as_alumni(identity)?;
    let requests = state
        .applications
        .mentorship_inbox(&alumni)
        .await
        .map_err(reject)?;
    Ok(Json(requests.into_iter().map(MentorshipView::from).collect()))
}

/// GET /me/mentorship - Requests the calling student has sent
#[utoipa::path(
    get,
    path = "/me/mentorship",
    responses(
        (status = 200, description = "Sent requests", body = [MentorshipView]),
        (status = 403, description = "Caller is not a student")
    )
)]
pub async fn my_requests_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<MentorshipView>>, HandlerError> {
    let student = as_student(identity)?;
    let requests = state
        .applications
        .mentorship_requests_for_student(&student)
        .await
        .map_err(reject)?;
    Ok(Json(requests.into_iter().map(MentorshipView::from).collect()))
}

/// POST /mentorship/{id}/status - Accept or reject a pending mentorship request
#[utoipa::path(
    post,
    path = "/mentorship/{id}/status",
    params(("id" = Uuid, Path, description = "Mentorship request id")),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Request updated", body = MentorshipView),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Request addressed to another alumni"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request already decided")
    )
)]
pub async fn decide_mentorship_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(request_id): Path<Uuid>,
    Json(req): Json<DecisionRequest>,
) -> Result<Json<MentorshipView>, HandlerError> {
    let alumni = as_alumni(identity)?;
    let to = parse_decision(&req.status)?;
    let request = state
        .applications
        .decide_mentorship(&alumni, request_id, to)
        .await
        .map_err(reject)?;
    Ok(Json(request.into()))
}
