//! crates/placement_core/src/memory.rs
//!
//! An in-process `RecordStore`. Every uniqueness rule and status transition
//! runs inside a single critical section, which gives the same atomicity the
//! PostgreSQL adapter gets from its constraints.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::domain::{
    Alumni, AtsScore, Company, Identity, Job, JobApplication, MentorshipRequest, NewProfile,
    NewUser, Status, Student, UserCredentials,
};
use crate::ports::{PlacementSnapshot, PortError, PortResult, RecordStore};

struct UserRow {
    identity: Identity,
    hashed_password: String,
}

#[derive(Default)]
struct Tables {
    users: Vec<UserRow>,
    sessions: HashMap<String, (Uuid, DateTime<Utc>)>,
    jobs: Vec<Job>,
    applications: Vec<JobApplication>,
    mentorship: Vec<MentorshipRequest>,
    ats_scores: Vec<AtsScore>,
}

impl Tables {
    fn students(&self) -> impl Iterator<Item = &Student> {
        self.users.iter().filter_map(|row| match &row.identity {
            Identity::Student(s) => Some(s),
            _ => None,
        })
    }

    fn companies(&self) -> impl Iterator<Item = &Company> {
        self.users.iter().filter_map(|row| match &row.identity {
            Identity::Company(c) => Some(c),
            _ => None,
        })
    }

    fn alumni(&self) -> impl Iterator<Item = &Alumni> {
        self.users.iter().filter_map(|row| match &row.identity {
            Identity::Alumni(a) => Some(a),
            _ => None,
        })
    }
}

/// A `RecordStore` held entirely in memory. Data lives as long as the value.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> PortResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| PortError::Unexpected("record store lock poisoned".to_string()))
    }
}

fn transition<T>(
    row: Option<&mut T>,
    what: &str,
    id: Uuid,
    to: Status,
    status: impl Fn(&mut T) -> &mut Status,
) -> PortResult<Option<T>>
where
    T: Clone,
{
    let row = row.ok_or_else(|| PortError::NotFound(format!("{} {} not found", what, id)))?;
    let current = status(row);
    if *current != Status::Pending {
        return Ok(None);
    }
    *current = to;
    Ok(Some(row.clone()))
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn insert_user(&self, user: NewUser) -> PortResult<Identity> {
        let mut tables = self.tables()?;
        let email_taken = tables
            .users
            .iter()
            .any(|row| row.identity.email().eq_ignore_ascii_case(&user.email));
        if email_taken {
            return Err(PortError::Conflict(format!("email {} already registered", user.email)));
        }

        let id = Uuid::new_v4();
        let email = user.email;
        let identity = match user.profile {
            NewProfile::Student(s) => {
                if tables.students().any(|existing| existing.roll_number == s.roll_number) {
                    return Err(PortError::Conflict(format!(
                        "roll number {} already registered",
                        s.roll_number
                    )));
                }
                Identity::Student(Student {
                    id,
                    email,
                    roll_number: s.roll_number,
                    name: s.name,
                    cgpa: s.cgpa,
                    branch: s.branch,
                    resume_url: s.resume_url,
                })
            }
            NewProfile::Company(c) => Identity::Company(Company {
                id,
                email,
                name: c.name,
                description: c.description,
                website: c.website,
            }),
            NewProfile::Alumni(a) => Identity::Alumni(Alumni {
                id,
                email,
                name: a.name,
                graduation_year: a.graduation_year,
                employer: a.employer,
                position: a.position,
                linkedin_url: a.linkedin_url,
                is_mentor: a.is_mentor,
            }),
        };

        tables.users.push(UserRow {
            identity: identity.clone(),
            hashed_password: user.hashed_password,
        });
        Ok(identity)
    }

    async fn find_identity(&self, user_id: Uuid) -> PortResult<Identity> {
        self.tables()?
            .users
            .iter()
            .find(|row| row.identity.id() == user_id)
            .map(|row| row.identity.clone())
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }

    async fn find_credentials_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        self.tables()?
            .users
            .iter()
            .find(|row| row.identity.email().eq_ignore_ascii_case(email))
            .map(|row| UserCredentials {
                user_id: row.identity.id(),
                email: row.identity.email().to_string(),
                hashed_password: row.hashed_password.clone(),
            })
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))
    }

    async fn list_students(&self) -> PortResult<Vec<Student>> {
        Ok(self.tables()?.students().cloned().collect())
    }

    async fn find_student(&self, student_id: Uuid) -> PortResult<Student> {
        self.tables()?
            .students()
            .find(|s| s.id == student_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Student {} not found", student_id)))
    }

    async fn find_alumni(&self, alumni_id: Uuid) -> PortResult<Alumni> {
        self.tables()?
            .alumni()
            .find(|a| a.id == alumni_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Alumni {} not found", alumni_id)))
    }

    async fn find_company(&self, company_id: Uuid) -> PortResult<Company> {
        self.tables()?
            .companies()
            .find(|c| c.id == company_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Company {} not found", company_id)))
    }

    async fn list_mentors(&self) -> PortResult<Vec<Alumni>> {
        Ok(self.tables()?.alumni().filter(|a| a.is_mentor).cloned().collect())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        self.tables()?
            .sessions
            .insert(session_id.to_string(), (user_id, expires_at));
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        match self.tables()?.sessions.get(session_id) {
            Some((user_id, expires_at)) if *expires_at > Utc::now() => Ok(*user_id),
            _ => Err(PortError::Unauthorized),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        self.tables()?.sessions.remove(session_id);
        Ok(())
    }

    async fn insert_job(&self, job: Job) -> PortResult<Job> {
        let mut tables = self.tables()?;
        if !tables.companies().any(|c| c.id == job.company_id) {
            return Err(PortError::NotFound(format!("Company {} not found", job.company_id)));
        }
        tables.jobs.push(job.clone());
        Ok(job)
    }

    async fn find_job(&self, job_id: Uuid) -> PortResult<Job> {
        self.tables()?
            .jobs
            .iter()
            .find(|j| j.id == job_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Job {} not found", job_id)))
    }

    async fn list_jobs(&self) -> PortResult<Vec<Job>> {
        Ok(self.tables()?.jobs.clone())
    }

    async fn jobs_for_company(&self, company_id: Uuid) -> PortResult<Vec<Job>> {
        Ok(self
            .tables()?
            .jobs
            .iter()
            .filter(|j| j.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn insert_application(&self, application: JobApplication) -> PortResult<JobApplication> {
        let mut tables = self.tables()?;
        let exists = tables
            .applications
            .iter()
            .any(|a| a.student_id == application.student_id && a.job_id == application.job_id);
        if exists {
            return Err(PortError::Conflict("application already exists".to_string()));
        }
        tables.applications.push(application.clone());
        Ok(application)
    }

    async fn find_application(&self, application_id: Uuid) -> PortResult<JobApplication> {
        self.tables()?
            .applications
            .iter()
            .find(|a| a.id == application_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Application {} not found", application_id)))
    }

    async fn applications_for_student(&self, student_id: Uuid) -> PortResult<Vec<JobApplication>> {
        Ok(self
            .tables()?
            .applications
            .iter()
            .filter(|a| a.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn applications_for_job(&self, job_id: Uuid) -> PortResult<Vec<JobApplication>> {
        Ok(self
            .tables()?
            .applications
            .iter()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn transition_application(
        &self,
        application_id: Uuid,
        to: Status,
    ) -> PortResult<Option<JobApplication>> {
        let mut tables = self.tables()?;
        let row = tables.applications.iter_mut().find(|a| a.id == application_id);
        transition(row, "Application", application_id, to, |a| &mut a.status)
    }

    async fn insert_mentorship_request(
        &self,
        request: MentorshipRequest,
    ) -> PortResult<MentorshipRequest> {
        let mut tables = self.tables()?;
        let exists = tables
            .mentorship
            .iter()
            .any(|r| r.student_id == request.student_id && r.alumni_id == request.alumni_id);
        if exists {
            return Err(PortError::Conflict("mentorship request already exists".to_string()));
        }
        tables.mentorship.push(request.clone());
        Ok(request)
    }

    async fn find_mentorship_request(&self, request_id: Uuid) -> PortResult<MentorshipRequest> {
        self.tables()?
            .mentorship
            .iter()
            .find(|r| r.id == request_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Mentorship request {} not found", request_id)))
    }

    async fn mentorship_requests_for_alumni(
        &self,
        alumni_id: Uuid,
    ) -> PortResult<Vec<MentorshipRequest>> {
        Ok(self
            .tables()?
            .mentorship
            .iter()
            .filter(|r| r.alumni_id == alumni_id)
            .cloned()
            .collect())
    }

    async fn mentorship_requests_for_student(
        &self,
        student_id: Uuid,
    ) -> PortResult<Vec<MentorshipRequest>> {
        Ok(self
            .tables()?
            .mentorship
            .iter()
            .filter(|r| r.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn transition_mentorship_request(
        &self,
        request_id: Uuid,
        to: Status,
    ) -> PortResult<Option<MentorshipRequest>> {
        let mut tables = self.tables()?;
        let row = tables.mentorship.iter_mut().find(|r| r.id == request_id);
        transition(row, "Mentorship request", request_id, to, |r| &mut r.status)
    }

    async fn upsert_ats_score(&self, score: AtsScore) -> PortResult<AtsScore> {
        let mut tables = self.tables()?;
        match tables
            .ats_scores
            .iter_mut()
            .find(|s| s.student_id == score.student_id && s.job_id == score.job_id)
        {
            Some(existing) => {
                existing.score = score.score;
                existing.feedback = score.feedback;
                existing.created_at = score.created_at;
                Ok(existing.clone())
            }
            None => {
                tables.ats_scores.push(score.clone());
                Ok(score)
            }
        }
    }

    async fn ats_scores_for_job(&self, job_id: Uuid) -> PortResult<Vec<AtsScore>> {
        Ok(self
            .tables()?
            .ats_scores
            .iter()
            .filter(|s| s.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn placement_snapshot(&self) -> PortResult<PlacementSnapshot> {
        let tables = self.tables()?;
        Ok(PlacementSnapshot {
            students: tables.students().cloned().collect(),
            companies: tables.companies().cloned().collect(),
            jobs: tables.jobs.clone(),
            applications: tables.applications.clone(),
        })
    }
}
