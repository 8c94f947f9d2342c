//! Emergency number entry screen.
//!
//! # Responsibility
//! - Load the stored number once on mount.
//! - Persist the field verbatim on explicit save.
//!
//! # Invariants
//! - A failed load leaves the field empty and emits one error notification.
//! - Storage is only mutated by [`EmergencyNumberScreen::save`].

use crate::model::notification::{
    Notifier, MSG_EMERGENCY_SAVED, MSG_LOAD_EMERGENCY_FAILED, MSG_SAVE_EMERGENCY_FAILED,
};
use crate::repo::preference_repo::PreferenceRepository;
use crate::service::preference_service::PreferenceService;
use log::{error, info};

pub const FIELD_PLACEHOLDER: &str = "Enter emergency number";
pub const SAVE_BUTTON_TITLE: &str = "Save";

#[derive(Debug, Clone)]
pub struct EmergencyNumberScreen {
    field: String,
    notifier: Notifier,
}

impl EmergencyNumberScreen {
    /// Mounts the screen and loads the stored number into the field.
    pub fn mount<R: PreferenceRepository>(repo: R, notifier: Notifier) -> Self {
        let mut screen = Self {
            field: String::new(),
            notifier,
        };
        screen.load(repo);
        screen
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Mirrors text input into the field. Nothing is persisted.
    pub fn set_field(&mut self, value: impl Into<String>) {
        self.field = value.into();
    }

    /// Reads the stored number. Absent values leave the field untouched.
    pub fn load<R: PreferenceRepository>(&mut self, repo: R) {
        match PreferenceService::new(repo).emergency_number() {
            Ok(Some(stored)) => {
                info!("event=emergency_number_load module=screen status=ok found=true");
                self.field = stored;
            }
            Ok(None) => {
                info!("event=emergency_number_load module=screen status=ok found=false");
            }
            Err(err) => {
                error!("event=emergency_number_load module=screen status=error error={err}");
                self.field.clear();
                self.notifier.error(MSG_LOAD_EMERGENCY_FAILED);
            }
        }
    }

    /// Writes the current field. No validation, no retry.
    pub fn save<R: PreferenceRepository>(&self, repo: R) -> bool {
        match PreferenceService::new(repo).set_emergency_number(&self.field) {
            Ok(()) => {
                info!("event=emergency_number_save module=screen status=ok");
                self.notifier.success(MSG_EMERGENCY_SAVED);
                true
            }
            Err(err) => {
                error!("event=emergency_number_save module=screen status=error error={err}");
                self.notifier.error(MSG_SAVE_EMERGENCY_FAILED);
                false
            }
        }
    }
}
