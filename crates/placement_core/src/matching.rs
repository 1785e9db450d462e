//! crates/placement_core/src/matching.rs
//!
//! Eligibility matching between students and jobs.

use std::sync::Arc;

use crate::domain::{Job, Student};
use crate::error::CoreResult;
use crate::ports::RecordStore;

/// A student is eligible for a job when their CGPA meets the job's minimum
/// and their branch is one of the job's eligible branches.
pub fn is_eligible(student: &Student, job: &Job) -> bool {
    job.min_cgpa <= student.cgpa && job.eligible_branches.contains(&student.branch)
}

/// Read-only queries pairing students with the jobs they qualify for.
#[derive(Clone)]
pub struct EligibilityMatcher {
    store: Arc<dyn RecordStore>,
}

impl EligibilityMatcher {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Every job the student qualifies for, in job creation order.
    pub async fn eligible_jobs(&self, student: &Student) -> CoreResult<Vec<Job>> {
        let jobs = self.store.list_jobs().await?;
        Ok(jobs.into_iter().filter(|job| is_eligible(student, job)).collect())
    }

    /// Every student who qualifies for the job, in registration order.
    pub async fn eligible_students(&self, job: &Job) -> CoreResult<Vec<Student>> {
        let students = self.store.list_students().await?;
        Ok(students
            .into_iter()
            .filter(|student| is_eligible(student, job))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BranchSet;
    use crate::testing::{job_with, register_company, register_student, store};

    fn student(cgpa: f64, branch: &str) -> Student {
        Student {
            id: uuid::Uuid::new_v4(),
            email: "s@college.test".to_string(),
            roll_number: "2024001".to_string(),
            name: "S".to_string(),
            cgpa,
            branch: branch.to_string(),
            resume_url: None,
        }
    }

    #[test]
    fn threshold_is_inclusive() {
        let job = job_with(uuid::Uuid::new_v4(), 7.5, &["Computer Science"]);
        assert!(is_eligible(&student(7.5, "Computer Science"), &job));
        assert!(!is_eligible(&student(7.49, "Computer Science"), &job));
    }

    #[test]
    fn branch_must_match_a_whole_entry() {
        let mut job = job_with(uuid::Uuid::new_v4(), 0.0, &[]);
        job.eligible_branches = BranchSet::new(["Electronics and Communication"]);
        assert!(!is_eligible(&student(9.0, "Electronics"), &job));
        assert!(!is_eligible(&student(9.0, "Communication"), &job));
        assert!(is_eligible(&student(9.0, "Electronics and Communication"), &job));
    }

    #[tokio::test]
    async fn eligible_jobs_filters_and_keeps_creation_order() {
        let store = store();
        let company = register_company(&store, "hr@techcorp.test").await;
        let first = job_with(company.id, 7.5, &["Computer Science", "Electronics"]);
        let second = job_with(company.id, 8.0, &["Computer Science"]);
        let third = job_with(company.id, 6.0, &["Electronics"]);
        for job in [&first, &second, &third] {
            store.insert_job(job.clone()).await.unwrap();
        }

        let matcher = EligibilityMatcher::new(store.clone());
        let cs = register_student(&store, "2024001", 8.5, "Computer Science").await;
        let ece = register_student(&store, "2024002", 7.0, "Electronics").await;

        let ids: Vec<_> = matcher
            .eligible_jobs(&cs)
            .await
            .unwrap()
            .into_iter()
            .map(|j| j.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id]);

        let ids: Vec<_> = matcher
            .eligible_jobs(&ece)
            .await
            .unwrap()
            .into_iter()
            .map(|j| j.id)
            .collect();
        assert_eq!(ids, vec![third.id]);
    }

    #[tokio::test]
    async fn eligible_students_is_the_inverse_query() {
        let store = store();
        let company = register_company(&store, "hr@techcorp.test").await;
        let job = job_with(company.id, 8.0, &["Computer Science"]);
        let strong = register_student(&store, "2024001", 9.0, "Computer Science").await;
        register_student(&store, "2024002", 7.0, "Computer Science").await;
        register_student(&store, "2024003", 9.5, "Mechanical").await;

        let matcher = EligibilityMatcher::new(store.clone());
        let students = matcher.eligible_students(&job).await.unwrap();
        assert_eq!(students, vec![strong]);
    }
}
