//! crates/placement_core/src/accounts.rs
//!
//! Registration and password login for students, companies and alumni.

use std::sync::Arc;
use tracing::info;

use crate::domain::{Identity, NewProfile, NewUser};
use crate::error::{CoreError, CoreResult};
use crate::ports::{CredentialVerifier, PortError, RecordStore};

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn RecordStore>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl AccountService {
    pub fn new(store: Arc<dyn RecordStore>, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { store, verifier }
    }

    /// Creates an account. Only the password digest is persisted.
    pub async fn register(&self, email: &str, password: &str, profile: NewProfile) -> CoreResult<Identity> {
        let email = email.trim().to_ascii_lowercase();
        validate_email(&email)?;
        if password.is_empty() {
            return Err(CoreError::Validation("password must not be empty".to_string()));
        }
        let profile = validate_profile(profile)?;

        let hashed_password = self.verifier.hash(password)?;
        let identity = self
            .store
            .insert_user(NewUser {
                email,
                hashed_password,
                profile,
            })
            .await
            .map_err(|e| match e {
                PortError::Conflict(_) => CoreError::DuplicateAccount,
                other => CoreError::Port(other),
            })?;
        info!(user_id = %identity.id(), kind = identity.kind().as_str(), "account registered");
        Ok(identity)
    }

    /// Resolves an email/password pair to the account it belongs to.
    pub async fn authenticate(&self, email: &str, password: &str) -> CoreResult<Identity> {
        let email = email.trim().to_ascii_lowercase();
        let credentials = match self.store.find_credentials_by_email(&email).await {
            Ok(credentials) => credentials,
            Err(PortError::NotFound(_)) => return Err(CoreError::InvalidCredentials),
            Err(other) => return Err(other.into()),
        };
        if !self.verifier.verify(&credentials.hashed_password, password) {
            return Err(CoreError::InvalidCredentials);
        }
        Ok(self.store.find_identity(credentials.user_id).await?)
    }
}

fn validate_email(email: &str) -> CoreResult<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("'{}' is not a valid email", email)))
    }
}

fn required(field: &str, value: String) -> CoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

fn validate_profile(profile: NewProfile) -> CoreResult<NewProfile> {
    Ok(match profile {
        NewProfile::Student(mut s) => {
            if !s.cgpa.is_finite() || !(0.0..=10.0).contains(&s.cgpa) {
                return Err(CoreError::Validation("CGPA must be between 0 and 10".to_string()));
            }
            s.roll_number = required("roll number", s.roll_number)?;
            s.name = required("name", s.name)?;
            s.branch = required("branch", s.branch)?;
            NewProfile::Student(s)
        }
        NewProfile::Company(mut c) => {
            c.name = required("company name", c.name)?;
            NewProfile::Company(c)
        }
        NewProfile::Alumni(mut a) => {
            a.name = required("name", a.name)?;
            NewProfile::Alumni(a)
        }
    })
}
