//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `RecordStore` port from the core crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.
//!
//! Uniqueness rules (email, roll number, one application per student and job,
//! one mentorship request per student and alumni) live in the schema, so a
//! racing duplicate insert surfaces here as a unique violation.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use placement_core::domain::{
    Alumni, AtsScore, BranchSet, Company, Identity, Job, JobApplication, MentorshipRequest,
    NewProfile, NewUser, Status, Student, UserCredentials, UserKind,
};
use placement_core::ports::{PlacementSnapshot, PortError, PortResult, RecordStore};
use sqlx::{FromRow, PgExecutor, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `RecordStore` port.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    /// Creates a new `PgRecordStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// Error Mapping
//=========================================================================================

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn not_found_or_unexpected(e: sqlx::Error, what: String) -> PortError {
    match e {
        sqlx::Error::RowNotFound => PortError::NotFound(what),
        other => unexpected(other),
    }
}

/// Unique violations become `Conflict`, broken references become `NotFound`.
fn write_error(e: sqlx::Error) -> PortError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return PortError::Conflict(db_err.message().to_string());
        }
        if db_err.is_foreign_key_violation() {
            return PortError::NotFound(db_err.message().to_string());
        }
    }
    unexpected(e)
}

fn parse_status(raw: &str) -> PortResult<Status> {
    raw.parse::<Status>().map_err(PortError::Unexpected)
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct StudentRecord {
    id: Uuid,
    email: String,
    roll_number: String,
    name: String,
    cgpa: f64,
    branch: String,
    resume_url: Option<String>,
}
impl StudentRecord {
    fn to_domain(self) -> Student {
        Student {
            id: self.id,
            email: self.email,
            roll_number: self.roll_number,
            name: self.name,
            cgpa: self.cgpa,
            branch: self.branch,
            resume_url: self.resume_url,
        }
    }
}

#[derive(FromRow)]
struct CompanyRecord {
    id: Uuid,
    email: String,
    name: String,
    description: Option<String>,
    website: Option<String>,
}
impl CompanyRecord {
    fn to_domain(self) -> Company {
        Company {
            id: self.id,
            email: self.email,
            name: self.name,
            description: self.description,
            website: self.website,
        }
    }
}

#[derive(FromRow)]
struct AlumniRecord {
    id: Uuid,
    email: String,
    name: String,
    graduation_year: i32,
    employer: Option<String>,
    position: Option<String>,
    linkedin_url: Option<String>,
    is_mentor: bool,
}
impl AlumniRecord {
    fn to_domain(self) -> Alumni {
        Alumni {
            id: self.id,
            email: self.email,
            name: self.name,
            graduation_year: self.graduation_year,
            employer: self.employer,
            position: self.position,
            linkedin_url: self.linkedin_url,
            is_mentor: self.is_mentor,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: Uuid,
    email: String,
    hashed_password: String,
}

#[derive(FromRow)]
struct JobRecord {
    id: Uuid,
    company_id: Uuid,
    title: String,
    description: String,
    compensation: f64,
    min_cgpa: f64,
    eligible_branches: Vec<String>,
    interview_process: String,
    interview_date: NaiveDate,
    created_at: DateTime<Utc>,
}
impl JobRecord {
    fn to_domain(self) -> Job {
        Job {
            id: self.id,
            company_id: self.company_id,
            title: self.title,
            description: self.description,
            compensation: self.compensation,
            min_cgpa: self.min_cgpa,
            eligible_branches: BranchSet::new(self.eligible_branches),
            interview_process: self.interview_process,
            interview_date: self.interview_date,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct ApplicationRecord {
    id: Uuid,
    student_id: Uuid,
    job_id: Uuid,
    status: String,
    applied_at: DateTime<Utc>,
}
impl ApplicationRecord {
    fn to_domain(self) -> PortResult<JobApplication> {
        Ok(JobApplication {
            id: self.id,
            student_id: self.student_id,
            job_id: self.job_id,
            status: parse_status(&self.status)?,
            applied_at: self.applied_at,
        })
    }
}

#[derive(FromRow)]
struct MentorshipRecord {
    id: Uuid,
    student_id: Uuid,
    alumni_id: Uuid,
    status: String,
    message: Option<String>,
    created_at: DateTime<Utc>,
}
impl MentorshipRecord {
    fn to_domain(self) -> PortResult<MentorshipRequest> {
        Ok(MentorshipRequest {
            id: self.id,
            student_id: self.student_id,
            alumni_id: self.alumni_id,
            status: parse_status(&self.status)?,
            message: self.message,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct AtsScoreRecord {
    id: Uuid,
    student_id: Uuid,
    job_id: Uuid,
    score: f64,
    feedback: Option<String>,
    created_at: DateTime<Utc>,
}
impl AtsScoreRecord {
    fn to_domain(self) -> AtsScore {
        AtsScore {
            id: self.id,
            student_id: self.student_id,
            job_id: self.job_id,
            score: self.score,
            feedback: self.feedback,
            created_at: self.created_at,
        }
    }
}

//=========================================================================================
// Shared SQL
//=========================================================================================

const SELECT_STUDENTS: &str = "SELECT u.id, u.email, s.roll_number, s.name, s.cgpa, s.branch, s.resume_url \
     FROM students s JOIN users u ON u.id = s.id";
const SELECT_COMPANIES: &str = "SELECT u.id, u.email, c.name, c.description, c.website \
     FROM companies c JOIN users u ON u.id = c.id";
const SELECT_ALUMNI: &str = "SELECT u.id, u.email, a.name, a.graduation_year, a.employer, a.position, \
     a.linkedin_url, a.is_mentor FROM alumni a JOIN users u ON u.id = a.id";
const USER_ORDER: &str = "ORDER BY u.created_at ASC, u.id ASC";

const JOB_COLUMNS: &str = "id, company_id, title, description, compensation, min_cgpa, \
     eligible_branches, interview_process, interview_date, created_at";
const APPLICATION_COLUMNS: &str = "id, student_id, job_id, status, applied_at";
const MENTORSHIP_COLUMNS: &str = "id, student_id, alumni_id, status, message, created_at";
const ATS_COLUMNS: &str = "id, student_id, job_id, score, feedback, created_at";

async fn fetch_students<'e, E: PgExecutor<'e>>(executor: E) -> PortResult<Vec<Student>> {
    let records = sqlx::query_as::<_, StudentRecord>(&format!("{} {}", SELECT_STUDENTS, USER_ORDER))
        .fetch_all(executor)
        .await
        .map_err(unexpected)?;
    Ok(records.into_iter().map(|r| r.to_domain()).collect())
}

async fn fetch_companies<'e, E: PgExecutor<'e>>(executor: E) -> PortResult<Vec<Company>> {
    let records = sqlx::query_as::<_, CompanyRecord>(&format!("{} {}", SELECT_COMPANIES, USER_ORDER))
        .fetch_all(executor)
        .await
        .map_err(unexpected)?;
    Ok(records.into_iter().map(|r| r.to_domain()).collect())
}

async fn fetch_jobs<'e, E: PgExecutor<'e>>(executor: E) -> PortResult<Vec<Job>> {
    let records = sqlx::query_as::<_, JobRecord>(&format!(
        "SELECT {} FROM jobs ORDER BY created_at ASC, id ASC",
        JOB_COLUMNS
    ))
    .fetch_all(executor)
    .await
    .map_err(unexpected)?;
    Ok(records.into_iter().map(|r| r.to_domain()).collect())
}

async fn fetch_applications<'e, E: PgExecutor<'e>>(executor: E) -> PortResult<Vec<JobApplication>> {
    let records = sqlx::query_as::<_, ApplicationRecord>(&format!(
        "SELECT {} FROM job_applications ORDER BY applied_at ASC, id ASC",
        APPLICATION_COLUMNS
    ))
    .fetch_all(executor)
    .await
    .map_err(unexpected)?;
    records.into_iter().map(|r| r.to_domain()).collect()
}

//=========================================================================================
// `RecordStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl RecordStore for PgRecordStore {
    // --- Users ---

    async fn insert_user(&self, user: NewUser) -> PortResult<Identity> {
        let id = Uuid::new_v4();
        let kind = user.profile.kind();
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        sqlx::query("INSERT INTO users (id, email, hashed_password, user_type) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(&user.email)
            .bind(&user.hashed_password)
            .bind(kind.as_str())
            .execute(&mut *tx)
            .await
            .map_err(write_error)?;

        let identity = match user.profile {
            NewProfile::Student(s) => {
                sqlx::query(
                    "INSERT INTO students (id, roll_number, name, cgpa, branch, resume_url) VALUES ($1, $2, $3, $4, $5, $6)",
                )
                .bind(id)
                .bind(&s.roll_number)
                .bind(&s.name)
                .bind(s.cgpa)
                .bind(&s.branch)
                .bind(&s.resume_url)
                .execute(&mut *tx)
                .await
                .map_err(write_error)?;
                Identity::Student(Student {
                    id,
                    email: user.email,
                    roll_number: s.roll_number,
                    name: s.name,
                    cgpa: s.cgpa,
                    branch: s.branch,
                    resume_url: s.resume_url,
                })
            }
            NewProfile::Company(c) => {
                sqlx::query("INSERT INTO companies (id, name, description, website) VALUES ($1, $2, $3, $4)")
                    .bind(id)
                    .bind(&c.name)
                    .bind(&c.description)
                    .bind(&c.website)
                    .execute(&mut *tx)
                    .await
                    .map_err(write_error)?;
                Identity::Company(Company {
                    id,
                    email: user.email,
                    name: c.name,
                    description: c.description,
                    website: c.website,
                })
            }
            NewProfile::Alumni(a) => {
                sqlx::query(
                    "INSERT INTO alumni (id, name, graduation_year, employer, position, linkedin_url, is_mentor) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7)",
                )
                .bind(id)
                .bind(&a.name)
                .bind(a.graduation_year)
                .bind(&a.employer)
                .bind(&a.position)
                .bind(&a.linkedin_url)
                .bind(a.is_mentor)
                .execute(&mut *tx)
                .await
                .map_err(write_error)?;
                Identity::Alumni(Alumni {
                    id,
                    email: user.email,
                    name: a.name,
                    graduation_year: a.graduation_year,
                    employer: a.employer,
                    position: a.position,
                    linkedin_url: a.linkedin_url,
                    is_mentor: a.is_mentor,
                })
            }
        };

        tx.commit().await.map_err(unexpected)?;
        Ok(identity)
    }

    async fn find_identity(&self, user_id: Uuid) -> PortResult<Identity> {
        let user_type = sqlx::query_scalar::<_, String>("SELECT user_type FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| not_found_or_unexpected(e, format!("User {} not found", user_id)))?;
        let kind = user_type.parse::<UserKind>().map_err(PortError::Unexpected)?;

        Ok(match kind {
            UserKind::Student => Identity::Student(self.find_student(user_id).await?),
            UserKind::Company => Identity::Company(self.find_company(user_id).await?),
            UserKind::Alumni => Identity::Alumni(self.find_alumni(user_id).await?),
        })
    }

    async fn find_credentials_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, email, hashed_password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_unexpected(e, format!("User {} not found", email)))?;
        Ok(UserCredentials {
            user_id: record.id,
            email: record.email,
            hashed_password: record.hashed_password,
        })
    }

    async fn list_students(&self) -> PortResult<Vec<Student>> {
        fetch_students(&self.pool).await
    }

    async fn find_student(&self, student_id: Uuid) -> PortResult<Student> {
        let record = sqlx::query_as::<_, StudentRecord>(&format!("{} WHERE u.id = $1", SELECT_STUDENTS))
            .bind(student_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| not_found_or_unexpected(e, format!("Student {} not found", student_id)))?;
        Ok(record.to_domain())
    }

    async fn find_alumni(&self, alumni_id: Uuid) -> PortResult<Alumni> {
        let record = sqlx::query_as::<_, AlumniRecord>(&format!("{} WHERE u.id = $1", SELECT_ALUMNI))
            .bind(alumni_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| not_found_or_unexpected(e, format!("Alumni {} not found", alumni_id)))?;
        Ok(record.to_domain())
    }

    async fn find_company(&self, company_id: Uuid) -> PortResult<Company> {
        let record = sqlx::query_as::<_, CompanyRecord>(&format!("{} WHERE u.id = $1", SELECT_COMPANIES))
            .bind(company_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| not_found_or_unexpected(e, format!("Company {} not found", company_id)))?;
        Ok(record.to_domain())
    }

    async fn list_mentors(&self) -> PortResult<Vec<Alumni>> {
        let records = sqlx::query_as::<_, AlumniRecord>(&format!(
            "{} WHERE a.is_mentor {}",
            SELECT_ALUMNI, USER_ORDER
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    // --- Auth Sessions ---

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(write_error)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > NOW()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    // --- Jobs ---

    async fn insert_job(&self, job: Job) -> PortResult<Job> {
        let record = sqlx::query_as::<_, JobRecord>(&format!(
            "INSERT INTO jobs ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {cols}",
            cols = JOB_COLUMNS
        ))
        .bind(job.id)
        .bind(job.company_id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(job.compensation)
        .bind(job.min_cgpa)
        .bind(job.eligible_branches.to_vec())
        .bind(&job.interview_process)
        .bind(job.interview_date)
        .bind(job.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?;
        Ok(record.to_domain())
    }

    async fn find_job(&self, job_id: Uuid) -> PortResult<Job> {
        let record = sqlx::query_as::<_, JobRecord>(&format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS))
            .bind(job_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| not_found_or_unexpected(e, format!("Job {} not found", job_id)))?;
        Ok(record.to_domain())
    }

    async fn list_jobs(&self) -> PortResult<Vec<Job>> {
        fetch_jobs(&self.pool).await
    }

    async fn jobs_for_company(&self, company_id: Uuid) -> PortResult<Vec<Job>> {
        let records = sqlx::query_as::<_, JobRecord>(&format!(
            "SELECT {} FROM jobs WHERE company_id = $1 ORDER BY created_at ASC, id ASC",
            JOB_COLUMNS
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    // --- Applications ---

    async fn insert_application(&self, application: JobApplication) -> PortResult<JobApplication> {
        sqlx::query_as::<_, ApplicationRecord>(&format!(
            "INSERT INTO job_applications ({cols}) VALUES ($1, $2, $3, $4, $5) RETURNING {cols}",
            cols = APPLICATION_COLUMNS
        ))
        .bind(application.id)
        .bind(application.student_id)
        .bind(application.job_id)
        .bind(application.status.as_str())
        .bind(application.applied_at)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?
        .to_domain()
    }

    async fn find_application(&self, application_id: Uuid) -> PortResult<JobApplication> {
        sqlx::query_as::<_, ApplicationRecord>(&format!(
            "SELECT {} FROM job_applications WHERE id = $1",
            APPLICATION_COLUMNS
        ))
        .bind(application_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_unexpected(e, format!("Application {} not found", application_id)))?
        .to_domain()
    }

    async fn applications_for_student(&self, student_id: Uuid) -> PortResult<Vec<JobApplication>> {
        let records = sqlx::query_as::<_, ApplicationRecord>(&format!(
            "SELECT {} FROM job_applications WHERE student_id = $1 ORDER BY applied_at ASC, id ASC",
            APPLICATION_COLUMNS
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn applications_for_job(&self, job_id: Uuid) -> PortResult<Vec<JobApplication>> {
        let records = sqlx::query_as::<_, ApplicationRecord>(&format!(
            "SELECT {} FROM job_applications WHERE job_id = $1 ORDER BY applied_at ASC, id ASC",
            APPLICATION_COLUMNS
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn transition_application(
        &self,
        application_id: Uuid,
        to: Status,
    ) -> PortResult<Option<JobApplication>> {
        let updated = sqlx::query_as::<_, ApplicationRecord>(&format!(
            "UPDATE job_applications SET status = $1 WHERE id = $2 AND status = 'pending' RETURNING {}",
            APPLICATION_COLUMNS
        ))
        .bind(to.as_str())
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        match updated {
            Some(record) => record.to_domain().map(Some),
            None => {
                // Distinguish "already decided" from "never existed".
                self.find_application(application_id).await?;
                Ok(None)
            }
        }
    }

    // --- Mentorship ---

    async fn insert_mentorship_request(
        &self,
        request: MentorshipRequest,
    ) -> PortResult<MentorshipRequest> {
        sqlx::query_as::<_, MentorshipRecord>(&format!(
            "INSERT INTO mentorship_requests ({cols}) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {cols}",
            cols = MENTORSHIP_COLUMNS
        ))
        .bind(request.id)
        .bind(request.student_id)
        .bind(request.alumni_id)
        .bind(request.status.as_str())
        .bind(&request.message)
        .bind(request.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?
        .to_domain()
    }

    async fn find_mentorship_request(&self, request_id: Uuid) -> PortResult<MentorshipRequest> {
        sqlx::query_as::<_, MentorshipRecord>(&format!(
            "SELECT {} FROM mentorship_requests WHERE id = $1",
            MENTORSHIP_COLUMNS
        ))
        .bind(request_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_unexpected(e, format!("Mentorship request {} not found", request_id)))?
        .to_domain()
    }

    async fn mentorship_requests_for_alumni(
        &self,
        alumni_id: Uuid,
    ) -> PortResult<Vec<MentorshipRequest>> {
        let records = sqlx::query_as::<_, MentorshipRecord>(&format!(
            "SELECT {} FROM mentorship_requests WHERE alumni_id = $1 ORDER BY created_at ASC, id ASC",
            MENTORSHIP_COLUMNS
        ))
        .bind(alumni_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn mentorship_requests_for_student(
        &self,
        student_id: Uuid,
    ) -> PortResult<Vec<MentorshipRequest>> {
        let records = sqlx::query_as::<_, MentorshipRecord>(&format!(
            "SELECT {} FROM mentorship_requests WHERE student_id = $1 ORDER BY created_at ASC, id ASC",
            MENTORSHIP_COLUMNS
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn transition_mentorship_request(
        &self,
        request_id: Uuid,
        to: Status,
    ) -> PortResult<Option<MentorshipRequest>> {
        let updated = sqlx::query_as::<_, MentorshipRecord>(&format!(
            "UPDATE mentorship_requests SET status = $1 WHERE id = $2 AND status = 'pending' RETURNING {}",
            MENTORSHIP_COLUMNS
        ))
        .bind(to.as_str())
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        match updated {
            Some(record) => record.to_domain().map(Some),
            None => {
                self.find_mentorship_request(request_id).await?;
                Ok(None)
            }
        }
    }

    // --- ATS Scores ---

    async fn upsert_ats_score(&self, score: AtsScore) -> PortResult<AtsScore> {
        let record = sqlx::query_as::<_, AtsScoreRecord>(&format!(
            "INSERT INTO ats_scores ({cols}) VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (student_id, job_id) DO UPDATE \
             SET score = EXCLUDED.score, feedback = EXCLUDED.feedback, created_at = EXCLUDED.created_at \
             RETURNING {cols}",
            cols = ATS_COLUMNS
        ))
        .bind(score.id)
        .bind(score.student_id)
        .bind(score.job_id)
        .bind(score.score)
        .bind(&score.feedback)
        .bind(score.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?;
        Ok(record.to_domain())
    }

    async fn ats_scores_for_job(&self, job_id: Uuid) -> PortResult<Vec<AtsScore>> {
        let records = sqlx::query_as::<_, AtsScoreRecord>(&format!(
            "SELECT {} FROM ats_scores WHERE job_id = $1 ORDER BY created_at ASC, id ASC",
            ATS_COLUMNS
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    // --- Analytics ---

    async fn placement_snapshot(&self) -> PortResult<PlacementSnapshot> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;

        let students = fetch_students(&mut *tx).await?;
        let companies = fetch_companies(&mut *tx).await?;
        let jobs = fetch_jobs(&mut *tx).await?;
        let applications = fetch_applications(&mut *tx).await?;
        tx.commit().await.map_err(unexpected)?;

        Ok(PlacementSnapshot {
            students,
            companies,
            jobs,
            applications,
        })
    }
}

// These run against a real Postgres: `DATABASE_URL=... cargo test -- --ignored`.
// `sqlx::test` creates a throwaway database per test and applies the migrations.
#[cfg(test)]
mod tests {
    use super::*;
    use placement_core::domain::{NewAlumni, NewCompany, NewStudent};

    async fn seed(store: &PgRecordStore) -> (Student, Company, Alumni, Job) {
        let student = match store
            .insert_user(NewUser {
                email: "john@college.test".to_string(),
                hashed_password: "digest".to_string(),
                profile: NewProfile::Student(NewStudent {
                    roll_number: "2024001".to_string(),
                    name: "John Doe".to_string(),
                    cgpa: 8.5,
                    branch: "Computer Science".to_string(),
                    resume_url: None,
                }),
            })
            .await
            .unwrap()
        {
            Identity::Student(s) => s,
            other => panic!("expected student, got {other:?}"),
        };
        let company = match store
            .insert_user(NewUser {
                email: "hr@techcorp.test".to_string(),
                hashed_password: "digest".to_string(),
                profile: NewProfile::Company(NewCompany {
                    name: "TechCorp".to_string(),
                    description: None,
                    website: None,
                }),
            })
            .await
            .unwrap()
        {
            Identity::Company(c) => c,
            other => panic!("expected company, got {other:?}"),
        };
        let mentor = match store
            .insert_user(NewUser {
                email: "priya@alumni.test".to_string(),
                hashed_password: "digest".to_string(),
                profile: NewProfile::Alumni(NewAlumni {
                    name: "Priya Sharma".to_string(),
                    graduation_year: 2018,
                    employer: None,
                    position: None,
                    linkedin_url: None,
                    is_mentor: true,
                }),
            })
            .await
            .unwrap()
        {
            Identity::Alumni(a) => a,
            other => panic!("expected alumni, got {other:?}"),
        };
        let job = store
            .insert_job(Job {
                id: Uuid::new_v4(),
                company_id: company.id,
                title: "Software Engineer".to_string(),
                description: "Backend services".to_string(),
                compensation: 1_200_000.0,
                min_cgpa: 7.5,
                eligible_branches: BranchSet::new(["Computer Science", "Electronics"]),
                interview_process: "Two technical rounds".to_string(),
                interview_date: NaiveDate::from_ymd_opt(2024, 11, 15).unwrap(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        (student, company, mentor, job)
    }

    fn application(student_id: Uuid, job_id: Uuid) -> JobApplication {
        JobApplication {
            id: Uuid::new_v4(),
            student_id,
            job_id,
            status: Status::Pending,
            applied_at: Utc::now(),
        }
    }

    fn mentorship(student_id: Uuid, alumni_id: Uuid) -> MentorshipRequest {
        MentorshipRequest {
            id: Uuid::new_v4(),
            student_id,
            alumni_id,
            status: Status::Pending,
            message: Some("Career advice".to_string()),
            created_at: Utc::now(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL pointing at Postgres"]
    async fn duplicate_rows_hit_unique_constraints(pool: PgPool) {
        let store = PgRecordStore::new(pool);
        let (student, _, mentor, job) = seed(&store).await;

        store.insert_application(application(student.id, job.id)).await.unwrap();
        let again = store.insert_application(application(student.id, job.id)).await;
        assert!(matches!(again, Err(PortError::Conflict(_))));

        store.insert_mentorship_request(mentorship(student.id, mentor.id)).await.unwrap();
        let again = store.insert_mentorship_request(mentorship(student.id, mentor.id)).await;
        assert!(matches!(again, Err(PortError::Conflict(_))));

        let taken = store
            .insert_user(NewUser {
                email: "john@college.test".to_string(),
                hashed_password: "digest".to_string(),
                profile: NewProfile::Company(NewCompany {
                    name: "Copycat".to_string(),
                    description: None,
                    website: None,
                }),
            })
            .await;
        assert!(matches!(taken, Err(PortError::Conflict(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL pointing at Postgres"]
    async fn decided_rows_are_not_transitioned_again(pool: PgPool) {
        let store = PgRecordStore::new(pool);
        let (student, _, mentor, job) = seed(&store).await;
        let row = store.insert_application(application(student.id, job.id)).await.unwrap();

        let first = store.transition_application(row.id, Status::Accepted).await.unwrap();
        assert_eq!(first.map(|a| a.status), Some(Status::Accepted));
        let second = store.transition_application(row.id, Status::Rejected).await.unwrap();
        assert!(second.is_none());
        assert_eq!(store.find_application(row.id).await.unwrap().status, Status::Accepted);

        let request = store
            .insert_mentorship_request(mentorship(student.id, mentor.id))
            .await
            .unwrap();
        let first = store
            .transition_mentorship_request(request.id, Status::Rejected)
            .await
            .unwrap();
        assert_eq!(first.map(|r| r.status), Some(Status::Rejected));
        let second = store
            .transition_mentorship_request(request.id, Status::Accepted)
            .await
            .unwrap();
        assert!(second.is_none());

        let missing = store.transition_application(Uuid::new_v4(), Status::Accepted).await;
        assert!(matches!(missing, Err(PortError::NotFound(_))));
    }
}
