//! Shared fixtures for the core's unit tests.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::domain::{
    Alumni, AtsScore, BranchSet, Company, Identity, Job, JobApplication, JobSpec,
    MentorshipRequest, NewAlumni, NewCompany, NewProfile, NewStudent, NewUser, Notification,
    Status, Student, UserCredentials,
};
use crate::memory::InMemoryStore;
use crate::ports::{
    CredentialVerifier, Notifier, PlacementSnapshot, PortError, PortResult, RecordStore,
};

pub(crate) fn store() -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::new())
}

pub(crate) async fn register_student(store: &InMemoryStore, roll: &str, cgpa: f64, branch: &str) -> Student {
    let user = NewUser {
        email: format!("{}@college.test", roll),
        hashed_password: "digest".to_string(),
        profile: NewProfile::Student(NewStudent {
            roll_number: roll.to_string(),
            name: format!("Student {}", roll),
            cgpa,
            branch: branch.to_string(),
            resume_url: None,
        }),
    };
    match store.insert_user(user).await.expect("student inserts") {
        Identity::Student(s) => s,
        other => panic!("expected student, got {other:?}"),
    }
}

pub(crate) async fn register_company(store: &InMemoryStore, email: &str) -> Company {
    let user = NewUser {
        email: email.to_string(),
        hashed_password: "digest".to_string(),
        profile: NewProfile::Company(NewCompany {
            name: "TechCorp".to_string(),
            description: None,
            website: Some("https://techcorp.test".to_string()),
        }),
    };
    match store.insert_user(user).await.expect("company inserts") {
        Identity::Company(c) => c,
        other => panic!("expected company, got {other:?}"),
    }
}

pub(crate) async fn register_alumni(store: &InMemoryStore, email: &str, is_mentor: bool) -> Alumni {
    let user = NewUser {
        email: email.to_string(),
        hashed_password: "digest".to_string(),
        profile: NewProfile::Alumni(NewAlumni {
            name: "Priya".to_string(),
            graduation_year: 2018,
            employer: Some("InnovaTech".to_string()),
            position: Some("Staff Engineer".to_string()),
            linkedin_url: None,
            is_mentor,
        }),
    };
    match store.insert_user(user).await.expect("alumni inserts") {
        Identity::Alumni(a) => a,
        other => panic!("expected alumni, got {other:?}"),
    }
}

pub(crate) fn job_with(company_id: Uuid, min_cgpa: f64, branches: &[&str]) -> Job {
    Job {
        id: Uuid::new_v4(),
        company_id,
        title: "Software Engineer".to_string(),
        description: "Build things".to_string(),
        compensation: 100_000.0,
        min_cgpa,
        eligible_branches: BranchSet::new(branches),
        interview_process: "1. Online test\n2. Technical interview\n3. HR interview".to_string(),
        interview_date: NaiveDate::from_ymd_opt(2024, 11, 15).expect("valid date"),
        created_at: Utc::now(),
    }
}

pub(crate) fn spec(min_cgpa: f64, branches: &[&str]) -> JobSpec {
    JobSpec {
        title: "Software Engineer".to_string(),
        description: "Build things".to_string(),
        compensation: 100_000.0,
        min_cgpa,
        eligible_branches: branches.iter().map(|b| b.to_string()).collect(),
        interview_process: "1. Online test\n2. Technical interview".to_string(),
        interview_date: "2024-11-15".to_string(),
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub(crate) fn sent(&self) -> Vec<Notification> {
        self.sent.lock().expect("notifier lock").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: Notification) -> PortResult<()> {
        self.sent.lock().expect("notifier lock").push(notification);
        Ok(())
    }
}

pub(crate) struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _notification: Notification) -> PortResult<()> {
        Err(PortError::Unexpected("mail queue closed".to_string()))
    }
}

/// Reversible stand-in for a real password hash.
pub(crate) struct FakeVerifier;

impl CredentialVerifier for FakeVerifier {
    fn hash(&self, password: &str) -> PortResult<String> {
        Ok(format!("fake${}", password.chars().rev().collect::<String>()))
    }

    fn verify(&self, digest: &str, password: &str) -> bool {
        self.hash(password).map(|d| d == digest).unwrap_or(false)
    }
}

/// Wraps the in-memory store and yields to the scheduler before every call,
/// so futures joined on one task interleave between a read and the write
/// that follows it. Can also pretend student profiles are gone.
pub(crate) struct YieldingStore {
    inner: Arc<InMemoryStore>,
    hide_students: bool,
}

impl YieldingStore {
    pub(crate) fn new(inner: Arc<InMemoryStore>) -> Self {
        Self {
            inner,
            hide_students: false,
        }
    }

    pub(crate) fn hiding_students(inner: Arc<InMemoryStore>) -> Self {
        Self {
            inner,
            hide_students: true,
        }
    }
}

#[async_trait]
impl RecordStore for YieldingStore {
    async fn insert_user(&self, user: NewUser) -> PortResult<Identity> {
        tokio::task::yield_now().await;
        self.inner.insert_user(user).await
    }

    async fn find_identity(&self, user_id: Uuid) -> PortResult<Identity> {
        tokio::task::yield_now().await;
        self.inner.find_identity(user_id).await
    }

    async fn find_credentials_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        tokio::task::yield_now().await;
        self.inner.find_credentials_by_email(email).await
    }

    async fn list_students(&self) -> PortResult<Vec<Student>> {
        tokio::task::yield_now().await;
        self.inner.list_students().await
    }

    async fn find_student(&self, student_id: Uuid) -> PortResult<Student> {
        tokio::task::yield_now().await;
        if self.hide_students {
            return Err(PortError::NotFound(format!("Student {} not found", student_id)));
        }
        self.inner.find_student(student_id).await
    }

    async fn find_alumni(&self, alumni_id: Uuid) -> PortResult<Alumni> {
        tokio::task::yield_now().await;
        self.inner.find_alumni(alumni_id).await
    }

    async fn find_company(&self, company_id: Uuid) -> PortResult<Company> {
        tokio::task::yield_now().await;
        self.inner.find_company(company_id).await
    }

    async fn list_mentors(&self) -> PortResult<Vec<Alumni>> {
        tokio::task::yield_now().await;
        self.inner.list_mentors().await
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        tokio::task::yield_now().await;
        self.inner.create_auth_session(session_id, user_id, expires_at).await
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        tokio::task::yield_now().await;
        self.inner.validate_auth_session(session_id).await
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        tokio::task::yield_now().await;
        self.inner.delete_auth_session(session_id).await
    }

    async fn insert_job(&self, job: Job) -> PortResult<Job> {
        tokio::task::yield_now().await;
        self.inner.insert_job(job).await
    }

    async fn find_job(&self, job_id: Uuid) -> PortResult<Job> {
        tokio::task::yield_now().await;
        self.inner.find_job(job_id).await
    }

    async fn list_jobs(&self) -> PortResult<Vec<Job>> {
        tokio::task::yield_now().await;
        self.inner.list_jobs().await
    }

    async fn jobs_for_company(&self, company_id: Uuid) -> PortResult<Vec<Job>> {
        tokio::task::yield_now().await;
        self.inner.jobs_for_company(company_id).await
    }

    async fn insert_application(&self, application: JobApplication) -> PortResult<JobApplication> {
        tokio::task::yield_now().await;
        self.inner.insert_application(application).await
    }

    async fn find_application(&self, application_id: Uuid) -> PortResult<JobApplication> {
        tokio::task::yield_now().await;
        self.inner.find_application(application_id).await
    }

    async fn applications_for_student(&self, student_id: Uuid) -> PortResult<Vec<JobApplication>> {
        tokio::task::yield_now().await;
        self.inner.applications_for_student(student_id).await
    }

    async fn applications_for_job(&self, job_id: Uuid) -> PortResult<Vec<JobApplication>> {
        tokio::task::yield_now().await;
        self.inner.applications_for_job(job_id).await
    }

    async fn transition_application(
        &self,
        application_id: Uuid,
        to: Status,
    ) -> PortResult<Option<JobApplication>> {
        tokio::task::yield_now().await;
        self.inner.transition_application(application_id, to).await
    }

    async fn insert_mentorship_request(
        &self,
        request: MentorshipRequest,
    ) -> PortResult<MentorshipRequest> {
        tokio::task::yield_now().await;
        self.inner.insert_mentorship_request(request).await
    }

    async fn find_mentorship_request(&self, request_id: Uuid) -> PortResult<MentorshipRequest> {
        tokio::task::yield_now().await;
        self.inner.find_mentorship_request(request_id).await
    }

    async fn mentorship_requests_for_alumni(
        &self,
        alumni_id: Uuid,
    ) -> PortResult<Vec<MentorshipRequest>> {
        tokio::task::yield_now().await;
        self.inner.mentorship_requests_for_alumni(alumni_id).await
    }

    async fn mentorship_requests_for_student(
        &self,
        student_id: Uuid,
    ) -> PortResult<Vec<MentorshipRequest>> {
        tokio::task::yield_now().await;
        self.inner.mentorship_requests_for_student(student_id).await
    }

    async fn transition_mentorship_request(
        &self,
        request_id: Uuid,
        to: Status,
    ) -> PortResult<Option<MentorshipRequest>> {
        tokio::task::yield_now().await;
        self.inner.transition_mentorship_request(request_id, to).await
    }

    async fn upsert_ats_score(&self, score: AtsScore) -> PortResult<AtsScore> {
        tokio::task::yield_now().await;
        self.inner.upsert_ats_score(score).await
    }

    async fn ats_scores_for_job(&self, job_id: Uuid) -> PortResult<Vec<AtsScore>> {
        tokio::task::yield_now().await;
        self.inner.ats_scores_for_job(job_id).await
    }

    async fn placement_snapshot(&self) -> PortResult<PlacementSnapshot> {
        tokio::task::yield_now().await;
        self.inner.placement_snapshot().await
    }
}
