//! crates/placement_core/src/error.rs
//!
//! Errors returned by the core engines to their callers.

use crate::ports::PortError;

/// Every failure a core operation can report. None of them is fatal; a failed
/// operation leaves the store as it was.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("job not found")]
    JobNotFound,
    #[error("student has already applied to this job")]
    DuplicateApplication,
    #[error("student has already requested mentorship from this alumni")]
    DuplicateRequest,
    #[error("alumni is not accepting mentorship requests")]
    NotAMentor,
    #[error("only pending records can be accepted or rejected")]
    InvalidTransition,
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("alumni not found")]
    AlumniNotFound,
    #[error("application not found")]
    ApplicationNotFound,
    #[error("mentorship request not found")]
    RequestNotFound,
    #[error("student not found")]
    StudentNotFound,
    #[error("caller does not own this record")]
    NotOwner,
    #[error("an account with this email or roll number already exists")]
    DuplicateAccount,
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Represents an error that propagated up from one of the ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),
}

/// A convenience type alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Maps a port `NotFound` to a domain error, passing everything else through.
pub(crate) fn not_found_as(err: PortError, mapped: CoreError) -> CoreError {
    match err {
        PortError::NotFound(_) => mapped,
        other => CoreError::Port(other),
    }
}
