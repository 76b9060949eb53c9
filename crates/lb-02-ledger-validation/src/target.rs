//! The system under validation.

use lb_01_ledger_resolution::{LedgerResolutionApi, LedgerSelectionHandler, PreferenceStore};
use shared_types::UserId;
use std::sync::Arc;

/// Resolution API, preference store and view handler for one user.
///
/// The checks drive the system only through these public surfaces, the same
/// way a user would.
#[derive(Clone)]
pub struct ValidationTarget {
    user_id: UserId,
    api: Arc<dyn LedgerResolutionApi>,
    preferences: Arc<dyn PreferenceStore>,
    view: Arc<LedgerSelectionHandler>,
}

impl ValidationTarget {
    /// Build a target with a fresh view handler bound to `user_id`.
    pub fn new(
        user_id: impl Into<UserId>,
        api: Arc<dyn LedgerResolutionApi>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        let user_id = user_id.into();
        let view = Arc::new(LedgerSelectionHandler::new(api.clone(), user_id.clone()));
        Self {
            user_id,
            api,
            preferences,
            view,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn api(&self) -> &dyn LedgerResolutionApi {
        self.api.as_ref()
    }

    pub fn preferences(&self) -> &dyn PreferenceStore {
        self.preferences.as_ref()
    }

    pub fn view(&self) -> &LedgerSelectionHandler {
        &self.view
    }
}
