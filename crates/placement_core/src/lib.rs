pub mod accounts;
pub mod analytics;
pub mod applications;
pub mod domain;
pub mod error;
pub mod matching;
pub mod memory;
pub mod ports;
pub mod postings;

mod notifications;
#[cfg(test)]
mod testing;

pub use accounts::AccountService;
pub use analytics::{AnalyticsAggregator, PlacementSummary};
pub use applications::{Applicant, ApplicationManager};
pub use domain::{
    Alumni, AtsScore, BranchSet, Company, Identity, Job, JobApplication, JobSpec,
    MentorshipRequest, NewAlumni, NewCompany, NewProfile, NewStudent, NewUser, Notification,
    NotificationKind, Status, Student, UserCredentials, UserKind,
};
pub use error::{CoreError, CoreResult};
pub use matching::EligibilityMatcher;
pub use memory::InMemoryStore;
pub use ports::{CredentialVerifier, Notifier, PlacementSnapshot, PortError, PortResult, RecordStore};
pub use postings::JobBoard;
