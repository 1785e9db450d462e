//! services/api/src/web/views.rs
//!
//! Request payloads and response bodies for the REST API, kept apart from the
//! core domain types so the wire format can change independently.

use chrono::{DateTime, NaiveDate, Utc};
use placement_core::{
    Alumni, Applicant, AtsScore, Identity, Job, JobApplication, JobSpec, MentorshipRequest,
    PlacementSummary, Student,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Request Payloads
//=========================================================================================

/// Registration form. `user_type` selects which profile fields are expected.
#[derive(Deserialize, ToSchema)]
#[serde(tag = "user_type", rename_all = "snake_case")]
pub enum SignupRequest {
    Student {
        email: String,
        password: String,
        roll_number: String,
        name: String,
        cgpa: f64,
        branch: String,
        resume_url: Option<String>,
    },
    Company {
        email: String,
        password: String,
        name: String,
        description: Option<String>,
        website: Option<String>,
    },
    Alumni {
        email: String,
        password: String,
        name: String,
        graduation_year: i32,
        employer: Option<String>,
        position: Option<String>,
        linkedin_url: Option<String>,
        #[serde(default)]
        is_mentor: bool,
    },
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct PostJobRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub compensation: f64,
    pub min_cgpa: f64,
    pub eligible_branches: Vec<String>,
    #[serde(default)]
    pub interview_process: String,
    /// `YYYY-MM-DD`
    pub interview_date: String,
}

impl From<PostJobRequest> for JobSpec {
    fn from(req: PostJobRequest) -> Self {
        JobSpec {
            title: req.title,
            description: req.description,
            compensation: req.compensation,
            min_cgpa: req.min_cgpa,
            eligible_branches: req.eligible_branches,
            interview_process: req.interview_process,
            interview_date: req.interview_date,
        }
    }
}

/// `accepted` or `rejected`.
#[derive(Deserialize, ToSchema)]
pub struct DecisionRequest {
    pub status: String,
}

/// An empty object sends the request without a note.
#[derive(Deserialize, ToSchema)]
pub struct MentorshipPayload {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct AtsScoreRequest {
    pub student_id: Uuid,
    pub score: f64,
    pub feedback: Option<String>,
}

//=========================================================================================
// Response Bodies
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub email: String,
    pub user_type: String,
}

impl From<&Identity> for AuthResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            user_id: identity.id(),
            email: identity.email().to_string(),
            user_type: identity.kind().as_str().to_string(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct JobView {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub compensation: f64,
    pub min_cgpa: f64,
    pub eligible_branches: Vec<String>,
    pub interview_process: String,
    pub interview_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<Job> for JobView {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            company_id: job.company_id,
            title: job.title,
            description: job.description,
            compensation: job.compensation,
            min_cgpa: job.min_cgpa,
            eligible_branches: job.eligible_branches.to_vec(),
            interview_process: job.interview_process,
            interview_date: job.interview_date,
            created_at: job.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ApplicationView {
    pub id: Uuid,
    pub student_id: Uuid,
    pub job_id: Uuid,
    pub status: String,
    pub applied_at: DateTime<Utc>,
}

impl From<JobApplication> for ApplicationView {
    fn from(a: JobApplication) -> Self {
        Self {
            id: a.id,
            student_id: a.student_id,
            job_id: a.job_id,
            status: a.status.as_str().to_string(),
            applied_at: a.applied_at,
        }
    }
}

/// One row of a student's dashboard.
#[derive(Serialize, ToSchema)]
pub struct AppliedJobView {
    pub application: ApplicationView,
    pub job: JobView,
}

#[derive(Serialize, ToSchema)]
pub struct StudentView {
    pub id: Uuid,
    pub email: String,
    pub roll_number: String,
    pub name: String,
    pub cgpa: f64,
    pub branch: String,
    pub resume_url: Option<String>,
}

impl From<Student> for StudentView {
    fn from(s: Student) -> Self {
        Self {
            id: s.id,
            email: s.email,
            roll_number: s.roll_number,
            name: s.name,
            cgpa: s.cgpa,
            branch: s.branch,
            resume_url: s.resume_url,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ApplicantView {
    pub student: StudentView,
    pub application: ApplicationView,
}

impl From<Applicant> for ApplicantView {
    fn from(a: Applicant) -> Self {
        Self {
            student: a.student.into(),
            application: a.application.into(),
        }
    }
}

/// Public profile of an alumni in the mentor network. Email is withheld.
#[derive(Serialize, ToSchema)]
pub struct MentorView {
    pub id: Uuid,
    pub name: String,
    pub graduation_year: i32,
    pub employer: Option<String>,
    pub position: Option<String>,
    pub linkedin_url: Option<String>,
}

impl From<Alumni> for MentorView {
    fn from(a: Alumni) -> Self {
        Self {
            id: a.id,
            name: a.name,
            graduation_year: a.graduation_year,
            employer: a.employer,
            position: a.position,
            linkedin_url: a.linkedin_url,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MentorshipView {
    pub id: Uuid,
    pub student_id: Uuid,
    pub alumni_id: Uuid,
    pub status: String,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<MentorshipRequest> for MentorshipView {
    fn from(r: MentorshipRequest) -> Self {
        Self {
            id: r.id,
            student_id: r.student_id,
            alumni_id: r.alumni_id,
            status: r.status.as_str().to_string(),
            message: r.message,
            created_at: r.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct AtsScoreView {
    pub id: Uuid,
    pub student_id: Uuid,
    pub job_id: Uuid,
    pub score: f64,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AtsScore> for AtsScoreView {
    fn from(s: AtsScore) -> Self {
        Self {
            id: s.id,
            student_id: s.student_id,
            job_id: s.job_id,
            score: s.score,
            feedback: s.feedback,
            created_at: s.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct PlacementSummaryView {
    pub total_students: u64,
    pub placed_students: u64,
    pub placement_ratio: f64,
    pub total_companies: u64,
    pub active_companies: u64,
    pub avg_accepted_compensation: f64,
    pub per_branch_placed_counts: BTreeMap<String, u64>,
}

impl From<PlacementSummary> for PlacementSummaryView {
    fn from(s: PlacementSummary) -> Self {
        Self {
            total_students: s.total_students,
            placed_students: s.placed_students,
            placement_ratio: s.placement_ratio,
            total_companies: s.total_companies,
            active_companies: s.active_companies,
            avg_accepted_compensation: s.avg_accepted_compensation,
            per_branch_placed_counts: s.per_branch_placed_counts,
        }
    }
}
