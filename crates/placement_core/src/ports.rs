//! crates/placement_core/src/ports.rs
//!
//! Defines the service contracts (traits) the placement core depends on.
//! These traits form the boundary of the hexagonal architecture, keeping the
//! core independent of the concrete database, mail transport and password
//! hashing scheme.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Alumni, AtsScore, Company, Identity, Job, JobApplication, MentorshipRequest, NewUser,
    Notification, Status, Student, UserCredentials,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, mail).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// A uniqueness rule rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// Everything the analytics rollup reads, taken from one consistent view of the store.
#[derive(Debug, Clone, Default)]
pub struct PlacementSnapshot {
    pub students: Vec<Student>,
    pub companies: Vec<Company>,
    pub jobs: Vec<Job>,
    pub applications: Vec<JobApplication>,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable storage for every entity of the portal.
///
/// Listing methods return rows ordered by creation time, then id.
#[async_trait]
pub trait RecordStore: Send + Sync {
    // --- Users ---
    /// Fails with `Conflict` if the email (or a student's roll number) is taken.
    async fn insert_user(&self, user: NewUser) -> PortResult<Identity>;

    async fn find_identity(&self, user_id: Uuid) -> PortResult<Identity>;

    async fn find_credentials_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn list_students(&self) -> PortResult<Vec<Student>>;

    async fn find_student(&self, student_id: Uuid) -> PortResult<Student>;

    async fn find_alumni(&self, alumni_id: Uuid) -> PortResult<Alumni>;

    async fn find_company(&self, company_id: Uuid) -> PortResult<Company>;

    async fn list_mentors(&self) -> PortResult<Vec<Alumni>>;

    // --- Auth Sessions ---
    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Jobs ---
    async fn insert_job(&self, job: Job) -> PortResult<Job>;

    async fn find_job(&self, job_id: Uuid) -> PortResult<Job>;

    async fn list_jobs(&self) -> PortResult<Vec<Job>>;

    async fn jobs_for_company(&self, company_id: Uuid) -> PortResult<Vec<Job>>;

    // --- Applications ---
    /// Atomic check-and-insert: `Conflict` if the (student, job) pair already exists.
    async fn insert_application(&self, application: JobApplication) -> PortResult<JobApplication>;

    async fn find_application(&self, application_id: Uuid) -> PortResult<JobApplication>;

    async fn applications_for_student(&self, student_id: Uuid) -> PortResult<Vec<JobApplication>>;

    async fn applications_for_job(&self, job_id: Uuid) -> PortResult<Vec<JobApplication>>;

    /// Moves a pending application to `to`. Returns `None` when the
    /// application is no longer pending, leaving it untouched.
    async fn transition_application(
        &self,
        application_id: Uuid,
        to: Status,
    ) -> PortResult<Option<JobApplication>>;

    // --- Mentorship ---
    /// Atomic check-and-insert: `Conflict` if the (student, alumni) pair already exists.
    async fn insert_mentorship_request(
        &self,
        request: MentorshipRequest,
    ) -> PortResult<MentorshipRequest>;

    async fn find_mentorship_request(&self, request_id: Uuid) -> PortResult<MentorshipRequest>;

    async fn mentorship_requests_for_alumni(
        &self,
        alumni_id: Uuid,
    ) -> PortResult<Vec<MentorshipRequest>>;

    async fn mentorship_requests_for_student(
        &self,
        student_id: Uuid,
    ) -> PortResult<Vec<MentorshipRequest>>;

    /// Same compare-and-set contract as `transition_application`.
    async fn transition_mentorship_request(
        &self,
        request_id: Uuid,
        to: Status,
    ) -> PortResult<Option<MentorshipRequest>>;

    // --- ATS Scores ---
    /// Replaces any earlier score for the same (student, job) pair.
    async fn upsert_ats_score(&self, score: AtsScore) -> PortResult<AtsScore>;

    async fn ats_scores_for_job(&self, job_id: Uuid) -> PortResult<Vec<AtsScore>>;

    // --- Analytics ---
    async fn placement_snapshot(&self) -> PortResult<PlacementSnapshot>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Hands a message to the delivery channel. Must not wait for delivery.
    async fn notify(&self, notification: Notification) -> PortResult<()>;
}

pub trait CredentialVerifier: Send + Sync {
    /// Produces a salted digest suitable for storage.
    fn hash(&self, password: &str) -> PortResult<String>;

    fn verify(&self, digest: &str, password: &str) -> bool;
}
