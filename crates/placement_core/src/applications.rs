//! crates/placement_core/src/applications.rs
//!
//! Job applications, mentorship requests and their status transitions.
//!
//! Duplicate prevention relies on the store's uniqueness rules rather than a
//! read-then-insert here, and status changes go through the store's
//! compare-and-set so that two concurrent decisions cannot both succeed.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    Alumni, AtsScore, Company, Job, JobApplication, MentorshipRequest, Notification,
    NotificationKind, Status, Student,
};
use crate::error::{not_found_as, CoreError, CoreResult};
use crate::notifications::notify_best_effort;
use crate::ports::{Notifier, PortError, RecordStore};

/// A student who applied to a job, with their application.
#[derive(Debug, Clone, PartialEq)]
pub struct Applicant {
    pub student: Student,
    pub application: JobApplication,
}

#[derive(Clone)]
pub struct ApplicationManager {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
}

impl ApplicationManager {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    //=====================================================================================
    // Job applications
    //=====================================================================================

    /// Files a pending application for the student and tells the company about it.
    pub async fn apply_to_job(&self, student: &Student, job_id: Uuid) -> CoreResult<JobApplication> {
        let job = self
            .store
            .find_job(job_id)
            .await
            .map_err(|e| not_found_as(e, CoreError::JobNotFound))?;

        let application = JobApplication {
            id: Uuid::new_v4(),
            student_id: student.id,
            job_id: job.id,
            status: Status::Pending,
            applied_at: Utc::now(),
        };
        let application = self
            .store
            .insert_application(application)
            .await
            .map_err(|e| match e {
                PortError::Conflict(_) => CoreError::DuplicateApplication,
                other => CoreError::Port(other),
            })?;
        info!(application_id = %application.id, student_id = %student.id, job_id = %job.id, "application filed");

        match self.store.find_company(job.company_id).await {
            Ok(company) => {
                let notification =
                    Notification::new(company.email, NotificationKind::ApplicationReceived)
                        .with("company_name", company.name)
                        .with("student_name", student.name.clone())
                        .with("roll_number", student.roll_number.clone())
                        .with("job_title", job.title.clone());
                notify_best_effort(self.notifier.as_ref(), notification).await;
            }
            Err(e) => warn!(job_id = %job.id, error = %e, "cannot notify job owner"),
        }

        Ok(application)
    }

    pub async fn applications_for_student(&self, student: &Student) -> CoreResult<Vec<(JobApplication, Job)>> {
        let applications = self.store.applications_for_student(student.id).await?;
        let mut out = Vec::with_capacity(applications.len());
        for application in applications {
            let job = self.store.find_job(application.job_id).await?;
            out.push((application, job));
        }
        Ok(out)
    }

    /// Everyone who applied to one of the company's jobs.
    pub async fn applicants_for_job(&self, company: &Company, job_id: Uuid) -> CoreResult<Vec<Applicant>> {
        let job = self.owned_job(company, job_id).await?;
        let applications = self.store.applications_for_job(job.id).await?;
        let mut applicants = Vec::with_capacity(applications.len());
        for application in applications {
            let student = self.store.find_student(application.student_id).await?;
            applicants.push(Applicant { student, application });
        }
        Ok(applicants)
    }

    /// Accepts or rejects a pending application on one of the company's jobs.
    pub async fn decide_application(
        &self,
        company: &Company,
        application_id: Uuid,
        to: Status,
    ) -> CoreResult<JobApplication> {
        let application = self
            .store
            .find_application(application_id)
            .await
            .map_err(|e| not_found_as(e, CoreError::ApplicationNotFound))?;
        let job = self.owned_job(company, application.job_id).await?;

        if to == Status::Pending {
            return Err(CoreError::InvalidTransition);
        }
        let updated = self
            .store
            .transition_application(application.id, to)
            .await
            .map_err(|e| not_found_as(e, CoreError::ApplicationNotFound))?
            .ok_or(CoreError::InvalidTransition)?;
        info!(application_id = %updated.id, status = %updated.status, "application decided");

        match self.store.find_student(updated.student_id).await {
            Ok(student) => {
                let notification =
                    Notification::new(student.email, NotificationKind::ApplicationDecided)
                        .with("student_name", student.name)
                        .with("company_name", company.name.clone())
                        .with("job_title", job.title)
                        .with("status", updated.status.as_str());
                notify_best_effort(self.notifier.as_ref(), notification).await;
            }
            Err(e) => warn!(application_id = %updated.id, error = %e, "cannot notify applicant"),
        }

        Ok(updated)
    }

    //=====================================================================================
    // ATS scores
    //=====================================================================================

    /// Stores a 0-100 screening score for an applicant, replacing any earlier one.
    pub async fn record_ats_score(
        &self,
        company: &Company,
        job_id: Uuid,
        student_id: Uuid,
        score: f64,
        feedback: Option<String>,
    ) -> CoreResult<AtsScore> {
        if !score.is_finite() || !(0.0..=100.0).contains(&score) {
            return Err(CoreError::Validation("score must be between 0 and 100".to_string()));
        }
        let job = self.owned_job(company, job_id).await?;
        let applied = self
            .store
            .applications_for_job(job.id)
            .await?
            .iter()
            .any(|a| a.student_id == student_id);
        if !applied {
            return Err(CoreError::StudentNotFound);
        }

        let score = AtsScore {
            id: Uuid::new_v4(),
            student_id,
            job_id: job.id,
            score,
            feedback: feedback.filter(|f| !f.trim().is_empty()),
            created_at: Utc::now(),
        };
        Ok(self.store.upsert_ats_score(score).await?)
    }

    pub async fn ats_scores_for_job(&self, company: &Company, job_id: Uuid) -> CoreResult<Vec<AtsScore>> {
        let job = self.owned_job(company, job_id).await?;
        Ok(self.store.ats_scores_for_job(job.id).await?)
    }

    //=====================================================================================
    // Mentorship
    //=====================================================================================

    pub async fn list_mentors(&self) -> CoreResult<Vec<Alumni>> {
        Ok(self.store.list_mentors().await?)
    }

    /// Sends a pending mentorship request to an alumni who mentors.
    pub async fn request_mentorship(
        &self,
        student: &Student,
        alumni_id: Uuid,
        message: Option<String>,
    ) -> CoreResult<MentorshipRequest> {
        let alumni = self
            .store
            .find_alumni(alumni_id)
            .await
            .map_err(|e| not_found_as(e, CoreError::AlumniNotFound))?;
        if !alumni.is_mentor {
            return Err(CoreError::NotAMentor);
        }

        let request = MentorshipRequest {
            id: Uuid::new_v4(),
            student_id: student.id,
            alumni_id: alumni.id,
            status: Status::Pending,
            message: message.filter(|m| !m.trim().is_empty()),
            created_at: Utc::now(),
        };
        let request = self
            .store
            .insert_mentorship_request(request)
            .await
            .map_err(|e| match e {
                PortError::Conflict(_) => CoreError::DuplicateRequest,
                other => CoreError::Port(other),
            })?;
        info!(request_id = %request.id, student_id = %student.id, alumni_id = %alumni.id, "mentorship requested");

        let mut notification = Notification::new(alumni.email, NotificationKind::MentorshipRequested)
            .with("alumni_name", alumni.name)
            .with("student_name", student.name.clone())
            .with("branch", student.branch.clone());
        if let Some(message) = &request.message {
            notification = notification.with("message", message.clone());
        }
        notify_best_effort(self.notifier.as_ref(), notification).await;

        Ok(request)
    }

    pub async fn mentorship_inbox(&self, alumni: &Alumni) -> CoreResult<Vec<MentorshipRequest>> {
        Ok(self.store.mentorship_requests_for_alumni(alumni.id).await?)
    }

    pub async fn mentorship_requests_for_student(&self, student: &Student) -> CoreResult<Vec<MentorshipRequest>> {
        Ok(self.store.mentorship_requests_for_student(student.id).await?)
    }

    /// Accepts or rejects a pending request addressed to this alumni.
    pub async fn decide_mentorship(
        &self,
        alumni: &Alumni,
        request_id: Uuid,
        to: Status,
    ) -> CoreResult<MentorshipRequest> {
        let request = self
            .store
            .find_mentorship_request(request_id)
            .await
            .map_err(|e| not_found_as(e, CoreError::RequestNotFound))?;
        if request.alumni_id != alumni.id {
            return Err(CoreError::NotOwner);
        }
        if to == Status::Pending {
            return Err(CoreError::InvalidTransition);
        }
        let updated = self
            .store
            .transition_mentorship_request(request.id, to)
            .await
            .map_err(|e| not_found_as(e, CoreError::RequestNotFound))?
            .ok_or(CoreError::InvalidTransition)?;
        info!(request_id = %updated.id, status = %updated.status, "mentorship request decided");

        match self.store.find_student(updated.student_id).await {
            Ok(student) => {
                let notification =
                    Notification::new(student.email, NotificationKind::MentorshipDecided)
                        .with("student_name", student.name)
                        .with("alumni_name", alumni.name.clone())
                        .with("status", updated.status.as_str());
                notify_best_effort(self.notifier.as_ref(), notification).await;
            }
            Err(e) => warn!(request_id = %updated.id, error = %e, "cannot notify requesting student"),
        }

        Ok(updated)
    }

    async fn owned_job(&self, company: &Company, job_id: Uuid) -> CoreResult<Job> {
        let job = self
            .store
            .find_job(job_id)
            .await
            .map_err(|e| not_found_as(e, CoreError::JobNotFound))?;
        if job.company_id != company.id {
            return Err(CoreError::NotOwner);
        }
        Ok(job)
    }
}
