//! crates/placement_core/src/domain.rs
//!
//! Defines the pure, core data structures for the placement portal.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

//=========================================================================================
// Users
//=========================================================================================

/// Discriminator stored alongside every user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserKind {
    Student,
    Company,
    Alumni,
}

impl UserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserKind::Student => "student",
            UserKind::Company => "company",
            UserKind::Alumni => "alumni",
        }
    }
}

impl FromStr for UserKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(UserKind::Student),
            "company" => Ok(UserKind::Company),
            "alumni" => Ok(UserKind::Alumni),
            other => Err(format!("unknown user kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: Uuid,
    pub email: String,
    pub roll_number: String,
    pub name: String,
    /// On a 0-10 scale.
    pub cgpa: f64,
    pub branch: String,
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alumni {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub graduation_year: i32,
    pub employer: Option<String>,
    pub position: Option<String>,
    pub linkedin_url: Option<String>,
    pub is_mentor: bool,
}

/// An authenticated user, resolved to its concrete subtype.
///
/// Callers dispatch on the variant to decide which operations are open to
/// the user; there is no shared base object to downcast from.
#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    Student(Student),
    Company(Company),
    Alumni(Alumni),
}

impl Identity {
    pub fn id(&self) -> Uuid {
        match self {
            Identity::Student(s) => s.id,
            Identity::Company(c) => c.id,
            Identity::Alumni(a) => a.id,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Identity::Student(s) => &s.email,
            Identity::Company(c) => &c.email,
            Identity::Alumni(a) => &a.email,
        }
    }

    pub fn kind(&self) -> UserKind {
        match self {
            Identity::Student(_) => UserKind::Student,
            Identity::Company(_) => UserKind::Company,
            Identity::Alumni(_) => UserKind::Alumni,
        }
    }
}

// Only used internally for login - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub roll_number: String,
    pub name: String,
    pub cgpa: f64,
    pub branch: String,
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCompany {
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAlumni {
    pub name: String,
    pub graduation_year: i32,
    pub employer: Option<String>,
    pub position: Option<String>,
    pub linkedin_url: Option<String>,
    pub is_mentor: bool,
}

/// Subtype-specific registration data.
#[derive(Debug, Clone, PartialEq)]
pub enum NewProfile {
    Student(NewStudent),
    Company(NewCompany),
    Alumni(NewAlumni),
}

impl NewProfile {
    pub fn kind(&self) -> UserKind {
        match self {
            NewProfile::Student(_) => UserKind::Student,
            NewProfile::Company(_) => UserKind::Company,
            NewProfile::Alumni(_) => UserKind::Alumni,
        }
    }
}

/// A user row ready to be persisted. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub profile: NewProfile,
}

//=========================================================================================
// Jobs
//=========================================================================================

/// The set of branches a job is open to.
///
/// Membership is exact: "Electronics" does not match a set holding
/// "Electronics and Communication".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchSet(BTreeSet<String>);

impl BranchSet {
    /// Builds a set from loose names, trimming each and dropping blanks.
    /// A name holding commas counts as several branches, since the stored
    /// form is comma-joined.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            names
                .into_iter()
                .flat_map(|n| {
                    n.as_ref()
                        .split(',')
                        .map(|part| part.trim().to_string())
                        .collect::<Vec<_>>()
                })
                .filter(|n| !n.is_empty())
                .collect(),
        )
    }

    pub fn contains(&self, branch: &str) -> bool {
        self.0.contains(branch.trim())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

/// Parses the comma-separated form used by the job-posting form.
impl FromStr for BranchSet {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(BranchSet::new([s]))
    }
}

impl fmt::Display for BranchSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub compensation: f64,
    pub min_cgpa: f64,
    pub eligible_branches: BranchSet,
    pub interview_process: String,
    pub interview_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Unvalidated job posting input, as supplied by a company.
#[derive(Debug, Clone)]
pub struct JobSpec {
    pub title: String,
    pub description: String,
    pub compensation: f64,
    pub min_cgpa: f64,
    pub eligible_branches: Vec<String>,
    pub interview_process: String,
    /// `YYYY-MM-DD`.
    pub interview_date: String,
}

//=========================================================================================
// Applications, mentorship, scoring
//=========================================================================================

/// Lifecycle of an application or a mentorship request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Pending,
    Accepted,
    Rejected,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Accepted => "accepted",
            Status::Rejected => "rejected",
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Status::Pending)
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Status::Pending),
            "accepted" => Ok(Status::Accepted),
            "rejected" => Ok(Status::Rejected),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobApplication {
    pub id: Uuid,
    pub student_id: Uuid,
    pub job_id: Uuid,
    pub status: Status,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MentorshipRequest {
    pub id: Uuid,
    pub student_id: Uuid,
    pub alumni_id: Uuid,
    pub status: Status,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Resume screening score a company attaches to an applicant.
#[derive(Debug, Clone, PartialEq)]
pub struct AtsScore {
    pub id: Uuid,
    pub student_id: Uuid,
    pub job_id: Uuid,
    pub score: f64,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

//=========================================================================================
// Notifications
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    JobPosted,
    ApplicationReceived,
    ApplicationDecided,
    MentorshipRequested,
    MentorshipDecided,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::JobPosted => "job_posted",
            NotificationKind::ApplicationReceived => "application_received",
            NotificationKind::ApplicationDecided => "application_decided",
            NotificationKind::MentorshipRequested => "mentorship_requested",
            NotificationKind::MentorshipDecided => "mentorship_decided",
        }
    }
}

/// An outbound message for a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: String,
    pub kind: NotificationKind,
    pub context: std::collections::BTreeMap<String, String>,
}

impl Notification {
    pub fn new(recipient: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            recipient: recipient.into(),
            kind,
            context: Default::default(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    fn field(&self, key: &str) -> &str {
        self.context.get(key).map(String::as_str).unwrap_or("")
    }

    /// Subject line for the message, filled from the context.
    pub fn subject(&self) -> String {
        match self.kind {
            NotificationKind::JobPosted => format!(
                "New Job Opportunity: {} at {}",
                self.field("job_title"),
                self.field("company_name")
            ),
            NotificationKind::ApplicationReceived => format!(
                "New Application: {} for {}",
                self.field("student_name"),
                self.field("job_title")
            ),
            NotificationKind::ApplicationDecided => format!(
                "Your application for {} was {}",
                self.field("job_title"),
                self.field("status")
            ),
            NotificationKind::MentorshipRequested => format!(
                "New Mentorship Request from {}",
                self.field("student_name")
            ),
            NotificationKind::MentorshipDecided => format!(
                "Your mentorship request to {} was {}",
                self.field("alumni_name"),
                self.field("status")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_set_matches_whole_names_only() {
        let set: BranchSet = "Electronics and Communication, Computer Science".parse().unwrap();
        assert!(set.contains("Computer Science"));
        assert!(!set.contains("Electronics"));
        assert!(!set.contains("Science"));
    }

    #[test]
    fn branch_set_drops_blank_entries() {
        let set: BranchSet = " Mechanical ,, ,Civil".parse().unwrap();
        assert_eq!(set.to_vec(), vec!["Civil".to_string(), "Mechanical".to_string()]);
        assert!(set.contains(" Civil "));
    }

    #[test]
    fn comma_joined_entry_becomes_separate_branches() {
        let set = BranchSet::new(["Computer Science,Electronics", "Civil"]);
        assert_eq!(set.len(), 3);
        assert!(set.contains("Electronics"));
        assert!(!set.contains("Computer Science,Electronics"));

        let reparsed: BranchSet = set.to_string().parse().unwrap();
        assert_eq!(reparsed, set);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Accepted".parse::<Status>(), Ok(Status::Accepted));
        assert!("hired".parse::<Status>().is_err());
        assert!(Status::Rejected.is_resolved());
        assert!(!Status::Pending.is_resolved());
    }

    #[test]
    fn subject_uses_context_fields() {
        let n = Notification::new("hr@techcorp.test", NotificationKind::ApplicationReceived)
            .with("student_name", "John Doe")
            .with("job_title", "Software Engineer");
        assert_eq!(n.subject(), "New Application: John Doe for Software Engineer");
    }
}
