//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user signup, login, and logout.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use placement_core::{Identity, NewAlumni, NewCompany, NewProfile, NewStudent};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::web::middleware::{session_id, SESSION_COOKIE};
use crate::web::state::AppState;
use crate::web::views::{AuthResponse, LoginRequest, SignupRequest};
use crate::web::{reject, HandlerError};

impl SignupRequest {
    fn into_parts(self) -> (String, String, NewProfile) {
        match self {
            SignupRequest::Student {
                email,
                password,
                roll_number,
                name,
                cgpa,
                branch,
                resume_url,
            } => (
                email,
                password,
                NewProfile::Student(NewStudent {
                    roll_number,
                    name,
                    cgpa,
                    branch,
                    resume_url,
                }),
            ),
            SignupRequest::Company {
                email,
                password,
                name,
                description,
                website,
            } => (
                email,
                password,
                NewProfile::Company(NewCompany {
                    name,
                    description,
                    website,
                }),
            ),
            SignupRequest::Alumni {
                email,
                password,
                name,
                graduation_year,
                employer,
                position,
                linkedin_url,
                is_mentor,
            } => (
                email,
                password,
                NewProfile::Alumni(NewAlumni {
                    name,
                    graduation_year,
                    employer,
                    position,
                    linkedin_url,
                    is_mentor,
                }),
            ),
        }
    }
}

/// Opens an auth session for the user and returns the matching cookie.
async fn open_session(state: &AppState, identity: &Identity) -> Result<String, HandlerError> {
    let auth_session_id = Uuid::new_v4().to_string();
    let ttl = Duration::days(state.config.session_ttl_days);

    state
        .store
        .create_auth_session(&auth_session_id, identity.id(), Utc::now() + ttl)
        .await
        .map_err(|e| {
            error!("Failed to create auth session: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session".to_string())
        })?;

    Ok(format!(
        "{}={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        auth_session_id,
        ttl.num_seconds()
    ))
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/signup - Create a new student, company or alumni account
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created successfully", body = AuthResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Email or roll number already registered"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let (email, password, profile) = req.into_parts();
    let identity = state
        .accounts
        .register(&email, &password, profile)
        .await
        .map_err(reject)?;

    let cookie = open_session(&state, &identity).await?;
    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse::from(&identity)),
    ))
}

/// POST /auth/login - Login with existing account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let identity = state
        .accounts
        .authenticate(&req.email, &req.password)
        .await
        .map_err(reject)?;
    info!(user_id = %identity.id(), "user logged in");

    let cookie = open_session(&state, &identity).await?;
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse::from(&identity)),
    ))
}

/// POST /auth/logout - Logout and invalidate session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "No active session")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HandlerError> {
    let auth_session_id = session_id(&headers)
        .ok_or((StatusCode::UNAUTHORIZED, "No session found".to_string()))?;

    state
        .store
        .delete_auth_session(auth_session_id)
        .await
        .map_err(|e| {
            error!("Failed to delete auth session: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to logout".to_string())
        })?;

    let cookie = format!(
        "{}=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0",
        SESSION_COOKIE
    );
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)]))
}
