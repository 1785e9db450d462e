//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use placement_core::ports::{CredentialVerifier, Notifier, RecordStore};
use placement_core::{
    AccountService, AnalyticsAggregator, ApplicationManager, EligibilityMatcher, JobBoard,
};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub config: Arc<Config>,
    pub accounts: AccountService,
    pub matcher: EligibilityMatcher,
    pub applications: ApplicationManager,
    pub job_board: JobBoard,
    pub analytics: AnalyticsAggregator,
}

impl AppState {
    /// Wires every core engine to the same store and notifier.
    pub fn new(
        store: Arc<dyn RecordStore>,
        notifier: Arc<dyn Notifier>,
        verifier: Arc<dyn CredentialVerifier>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            accounts: AccountService::new(store.clone(), verifier),
            matcher: EligibilityMatcher::new(store.clone()),
            applications: ApplicationManager::new(store.clone(), notifier.clone()),
            job_board: JobBoard::new(store.clone(), notifier),
            analytics: AnalyticsAggregator::new(store.clone()),
            store,
            config,
        }
    }
}
