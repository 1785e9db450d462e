//! crates/placement_core/src/analytics.rs
//!
//! Placement statistics, recomputed from the store on every call.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::Status;
use crate::error::CoreResult;
use crate::ports::{PlacementSnapshot, RecordStore};

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementSummary {
    pub total_students: u64,
    /// Distinct students holding at least one accepted application.
    pub placed_students: u64,
    pub placement_ratio: f64,
    pub total_companies: u64,
    /// Companies that have posted at least one job.
    pub active_companies: u64,
    /// Mean job compensation across accepted applications.
    pub avg_accepted_compensation: f64,
    pub per_branch_placed_counts: BTreeMap<String, u64>,
}

#[derive(Clone)]
pub struct AnalyticsAggregator {
    store: Arc<dyn RecordStore>,
}

impl AnalyticsAggregator {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn placement_summary(&self) -> CoreResult<PlacementSummary> {
        let snapshot = self.store.placement_snapshot().await?;
        Ok(summarize(&snapshot))
    }
}

/// Computes the summary from a snapshot. Accepted applications pointing at
/// unknown jobs or students are ignored.
pub fn summarize(snapshot: &PlacementSnapshot) -> PlacementSummary {
    let compensation: HashMap<Uuid, f64> = snapshot
        .jobs
        .iter()
        .map(|job| (job.id, job.compensation))
        .collect();
    let branches: HashMap<Uuid, &str> = snapshot
        .students
        .iter()
        .map(|s| (s.id, s.branch.as_str()))
        .collect();

    let mut placed: HashSet<Uuid> = HashSet::new();
    let mut accepted_pay = Vec::new();
    for application in snapshot
        .applications
        .iter()
        .filter(|a| a.status == Status::Accepted)
    {
        let Some(pay) = compensation.get(&application.job_id) else {
            continue;
        };
        accepted_pay.push(*pay);
        if branches.contains_key(&application.student_id) {
            placed.insert(application.student_id);
        }
    }

    let mut per_branch_placed_counts = BTreeMap::new();
    for student_id in &placed {
        if let Some(branch) = branches.get(student_id) {
            *per_branch_placed_counts.entry(branch.to_string()).or_insert(0) += 1;
        }
    }

    let total_students = snapshot.students.len() as u64;
    let placed_students = placed.len() as u64;
    let placement_ratio = if total_students == 0 {
        0.0
    } else {
        placed_students as f64 / total_students as f64
    };
    let avg_accepted_compensation = if accepted_pay.is_empty() {
        0.0
    } else {
        accepted_pay.iter().sum::<f64>() / accepted_pay.len() as f64
    };
    let active_companies = snapshot
        .jobs
        .iter()
        .map(|job| job.company_id)
        .filter(|id| snapshot.companies.iter().any(|c| c.id == *id))
        .collect::<HashSet<_>>()
        .len() as u64;

    PlacementSummary {
        total_students,
        placed_students,
        placement_ratio,
        total_companies: snapshot.companies.len() as u64,
        active_companies,
        avg_accepted_compensation,
        per_branch_placed_counts,
    }
}
