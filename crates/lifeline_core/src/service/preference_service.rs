//! Emergency number persistence.

use crate::repo::preference_repo::{PreferenceRepository, RepoResult};

/// Fixed storage key for the emergency contact number.
pub const EMERGENCY_NUMBER_KEY: &str = "emergencyNumber";

/// Preference use cases over any repository implementation.
pub struct PreferenceService<R: PreferenceRepository> {
    repo: R,
}

impl<R: PreferenceRepository> PreferenceService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stored emergency number, or `None` if it was never saved.
    pub fn emergency_number(&self) -> RepoResult<Option<String>> {
        self.repo.get(EMERGENCY_NUMBER_KEY)
    }

    /// Stores `value` verbatim. No format validation; empty is allowed.
    pub fn set_emergency_number(&self, value: &str) -> RepoResult<()> {
        self.repo.set(EMERGENCY_NUMBER_KEY, value)
    }
}
