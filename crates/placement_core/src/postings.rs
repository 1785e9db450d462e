//! crates/placement_core/src/postings.rs
//!
//! Job posting by companies, with notification of every eligible student.

use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::{BranchSet, Company, Job, JobSpec, Notification, NotificationKind};
use crate::error::{CoreError, CoreResult};
use crate::matching::EligibilityMatcher;
use crate::notifications::notify_best_effort;
use crate::ports::{Notifier, RecordStore};

pub const INTERVIEW_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone)]
pub struct JobBoard {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
    matcher: EligibilityMatcher,
}

impl JobBoard {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        let matcher = EligibilityMatcher::new(store.clone());
        Self {
            store,
            notifier,
            matcher,
        }
    }

    /// Validates and stores a new job, then notifies every student who qualifies.
    pub async fn post_job(&self, company: &Company, spec: JobSpec) -> CoreResult<Job> {
        let job = validate(company, spec)?;
        let job = self.store.insert_job(job).await?;
        info!(job_id = %job.id, company_id = %company.id, title = %job.title, "job posted");

        let students = self.matcher.eligible_students(&job).await?;
        let sends = students.into_iter().map(|student| {
            let notification = Notification::new(student.email, NotificationKind::JobPosted)
                .with("student_name", student.name)
                .with("company_name", company.name.clone())
                .with("job_title", job.title.clone())
                .with("compensation", format!("{:.2}", job.compensation))
                .with("interview_date", job.interview_date.format(INTERVIEW_DATE_FORMAT).to_string());
            notify_best_effort(self.notifier.as_ref(), notification)
        });
        join_all(sends).await;

        Ok(job)
    }

    pub async fn jobs_for_company(&self, company: &Company) -> CoreResult<Vec<Job>> {
        Ok(self.store.jobs_for_company(company.id).await?)
    }
}

fn validate(company: &Company, spec: JobSpec) -> CoreResult<Job> {
    let title = spec.title.trim();
    if title.is_empty() {
        return Err(CoreError::Validation("title must not be empty".to_string()));
    }
    if !spec.compensation.is_finite() || spec.compensation < 0.0 {
        return Err(CoreError::Validation("compensation must be zero or more".to_string()));
    }
    if !spec.min_cgpa.is_finite() || !(0.0..=10.0).contains(&spec.min_cgpa) {
        return Err(CoreError::Validation("minimum CGPA must be between 0 and 10".to_string()));
    }
    let eligible_branches = BranchSet::new(&spec.eligible_branches);
    if eligible_branches.is_empty() {
        return Err(CoreError::Validation("at least one eligible branch is required".to_string()));
    }
    // Past dates are accepted.
    let interview_date = NaiveDate::parse_from_str(spec.interview_date.trim(), INTERVIEW_DATE_FORMAT)
        .map_err(|_| {
            CoreError::Validation(format!(
                "interview date '{}' is not a YYYY-MM-DD date",
                spec.interview_date
            ))
        })?;

    Ok(Job {
        id: Uuid::new_v4(),
        company_id: company.id,
        title: title.to_string(),
        description: spec.description,
        compensation: spec.compensation,
        min_cgpa: spec.min_cgpa,
        eligible_branches,
        interview_process: spec.interview_process,
        interview_date,
        created_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{register_company, register_student, spec, store, RecordingNotifier};

    fn board() -> (Arc<crate::memory::InMemoryStore>, Arc<RecordingNotifier>, JobBoard) {
        let store = store();
        let notifier = Arc::new(RecordingNotifier::default());
        let board = JobBoard::new(store.clone(), notifier.clone());
        (store, notifier, board)
    }

    #[tokio::test]
    async fn posted_job_reaches_matching_students_only() {
        let (store, notifier, board) = board();
        let company = register_company(&store, "hr@techcorp.test").await;
        let high = register_student(&store, "2024001", 8.5, "Electronics").await;
        register_student(&store, "2024002", 7.0, "Electronics").await;
        register_student(&store, "2024003", 9.0, "Mechanical").await;

        let job = board
            .post_job(&company, spec(7.5, &["Computer Science", "Electronics"]))
            .await
            .unwrap();

        let matcher = EligibilityMatcher::new(store.clone());
        assert_eq!(matcher.eligible_jobs(&high).await.unwrap(), vec![job.clone()]);

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, high.email);
        assert_eq!(sent[0].kind, NotificationKind::JobPosted);
        assert_eq!(sent[0].subject(), "New Job Opportunity: Software Engineer at TechCorp");
    }

    #[tokio::test]
    async fn low_cgpa_student_does_not_see_job() {
        let (store, _, board) = board();
        let company = register_company(&store, "hr@techcorp.test").await;
        let low = register_student(&store, "2024002", 7.0, "Electronics").await;
        board
            .post_job(&company, spec(7.5, &["Computer Science", "Electronics"]))
            .await
            .unwrap();

        let matcher = EligibilityMatcher::new(store.clone());
        assert!(matcher.eligible_jobs(&low).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_postings_are_rejected_and_not_stored() {
        let (store, _, board) = board();
        let company = register_company(&store, "hr@techcorp.test").await;

        let mut negative_pay = spec(7.0, &["Civil"]);
        negative_pay.compensation = -1.0;
        let cgpa_too_high = spec(10.5, &["Civil"]);
        let no_branches = spec(7.0, &[" ", ""]);
        let mut bad_date = spec(7.0, &["Civil"]);
        bad_date.interview_date = "15/11/2024".to_string();
        let mut untitled = spec(7.0, &["Civil"]);
        untitled.title = "   ".to_string();

        for bad in [negative_pay, cgpa_too_high, no_branches, bad_date, untitled] {
            match board.post_job(&company, bad).await {
                Err(CoreError::Validation(_)) => {}
                other => panic!("expected validation error, got {other:?}"),
            }
        }
        assert!(board.jobs_for_company(&company).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn past_interview_dates_are_allowed() {
        let (store, _, board) = board();
        let company = register_company(&store, "hr@techcorp.test").await;
        let mut old = spec(0.0, &["Civil"]);
        old.interview_date = "2001-01-01".to_string();

        let job = board.post_job(&company, old).await.unwrap();
        assert_eq!(job.interview_date, NaiveDate::from_ymd_opt(2001, 1, 1).unwrap());
        assert_eq!(board.jobs_for_company(&company).await.unwrap(), vec![job]);
    }

    #[tokio::test]
    async fn comma_joined_branch_entry_is_split_before_matching() {
        let (store, notifier, board) = board();
        let company = register_company(&store, "hr@techcorp.test").await;
        let electronics = register_student(&store, "21EC007", 9.0, "Electronics").await;

        let job = board
            .post_job(&company, spec(7.0, &["Computer Science,Electronics"]))
            .await
            .unwrap();
        assert_eq!(job.eligible_branches.len(), 2);
        assert!(job.eligible_branches.contains("Electronics"));
        assert!(crate::matching::is_eligible(&electronics, &job));

        let reparsed: BranchSet = job.eligible_branches.to_string().parse().unwrap();
        assert_eq!(reparsed, job.eligible_branches);
        assert_eq!(notifier.sent().len(), 1);
    }
}
