//! App shell: navigation stack plus the screens mounted on it.
//!
//! # Responsibility
//! - Mount a fresh screen on every push and unmount it on pop.
//! - Hand each screen its collaborators; screens never see each other.
//!
//! # Invariants
//! - `pushed` mirrors `navigator.stack()` above the root, one-to-one.
//! - The root emergency number screen stays mounted for the shell lifetime.
//! - Field edits and saves go to the emergency number screen on top, if any.

use crate::capability::{CameraProvider, ContactsProvider, LocationProvider};
use crate::model::notification::Notifier;
use crate::repo::preference_repo::SqlitePreferenceRepository;
use crate::screen::contacts::ContactDirectoryScreen;
use crate::screen::emergency_number::EmergencyNumberScreen;
use crate::screen::environment::{Clock, EnvironmentDeps, EnvironmentScreen};
use crate::screen::navigation::{HeaderAction, Navigator};
use crate::screen::scan::ScanScreen;
use crate::screen::{parse_screen_name, NavigationError, ScreenName};
use crate::service::weather::WeatherClient;
use log::info;
use rusqlite::Connection;
use std::sync::Arc;
use tokio::runtime::Handle;

/// Collaborators shared by screen factories.
#[derive(Clone)]
pub struct AppContext {
    pub runtime: Handle,
    pub contacts: Arc<dyn ContactsProvider>,
    pub location: Arc<dyn LocationProvider>,
    pub camera: Arc<dyn CameraProvider>,
    pub weather: Arc<dyn WeatherClient>,
    pub clock: Arc<dyn Clock>,
    pub notifier: Notifier,
}

/// One live screen instance.
#[derive(Debug)]
pub enum MountedScreen {
    EmergencyNumber(EmergencyNumberScreen),
    Contacts(ContactDirectoryScreen),
    WeatherAndTime(EnvironmentScreen),
    About(ScanScreen),
}

impl MountedScreen {
    pub fn name(&self) -> ScreenName {
        match self {
            Self::EmergencyNumber(_) => ScreenName::EmergencyNumber,
            Self::Contacts(_) => ScreenName::Contacts,
            Self::WeatherAndTime(_) => ScreenName::WeatherAndTime,
            Self::About(_) => ScreenName::About,
        }
    }

    fn unmount(self) {
        match self {
            Self::EmergencyNumber(_) => {}
            Self::Contacts(screen) => screen.unmount(),
            Self::WeatherAndTime(screen) => screen.unmount(),
            Self::About(screen) => screen.unmount(),
        }
    }
}

pub struct AppShell {
    ctx: AppContext,
    conn: Connection,
    navigator: Navigator,
    root: EmergencyNumberScreen,
    pushed: Vec<MountedScreen>,
}

impl AppShell {
    /// Builds the shell and mounts the root screen.
    ///
    /// `conn` must come from [`crate::db::open_db`] so migrations are applied.
    pub fn new(ctx: AppContext, conn: Connection) -> Self {
        let root = EmergencyNumberScreen::mount(
            SqlitePreferenceRepository::new(&conn),
            ctx.notifier.clone(),
        );
        Self {
            ctx,
            conn,
            navigator: Navigator::new(),
            root,
            pushed: Vec::new(),
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn current(&self) -> ScreenName {
        self.navigator.current()
    }

    /// Top-most pushed screen; `None` while the root is visible.
    pub fn top(&self) -> Option<&MountedScreen> {
        self.pushed.last()
    }

    pub fn header_action(&self) -> Option<HeaderAction> {
        self.navigator.header_action()
    }

    /// Pushes and mounts `target`. Returns `false` when it is already on top.
    pub fn navigate(&mut self, target: ScreenName) -> bool {
        if !self.navigator.navigate(target) {
            return false;
        }
        let screen = self.mount(target);
        self.pushed.push(screen);
        info!(
            "event=navigate module=shell status=ok target={} depth={}",
            target.log_id(),
            self.navigator.depth()
        );
        true
    }

    /// Route-key variant of [`AppShell::navigate`].
    pub fn navigate_to(&mut self, route: &str) -> Result<bool, NavigationError> {
        let target = parse_screen_name(route)?;
        Ok(self.navigate(target))
    }

    /// Pops and unmounts the top screen. `None` on the root.
    pub fn back(&mut self) -> Option<ScreenName> {
        let popped = self.navigator.back()?;
        if let Some(screen) = self.pushed.pop() {
            screen.unmount();
        }
        info!(
            "event=navigate_back module=shell status=ok from={}",
            popped.log_id()
        );
        Some(popped)
    }

    /// Runs the current screen's header action, if it has one.
    pub fn press_header_action(&mut self) -> bool {
        match self.header_action() {
            Some(action) => self.navigate(action.target),
            None => false,
        }
    }

    /// The emergency number screen the user is looking at: the top-most
    /// pushed copy when one is on top, otherwise the root.
    pub fn emergency_number(&self) -> &EmergencyNumberScreen {
        match self.pushed.last() {
            Some(MountedScreen::EmergencyNumber(screen)) => screen,
            _ => &self.root,
        }
    }

    fn emergency_number_mut(&mut self) -> &mut EmergencyNumberScreen {
        match self.pushed.last_mut() {
            Some(MountedScreen::EmergencyNumber(screen)) => screen,
            _ => &mut self.root,
        }
    }

    pub fn set_emergency_field(&mut self, value: impl Into<String>) {
        self.emergency_number_mut().set_field(value);
    }

    /// Saves the visible emergency number field to durable storage.
    pub fn save_emergency_number(&self) -> bool {
        self.emergency_number()
            .save(SqlitePreferenceRepository::new(&self.conn))
    }

    /// "Tap to Scan Again" on the scan screen. `false` when it is not on top
    /// or has nothing to reset.
    pub fn reset_scan(&self) -> bool {
        match self.pushed.last() {
            Some(MountedScreen::About(screen)) => screen.reset_to_scanning(),
            _ => false,
        }
    }

    fn mount(&self, target: ScreenName) -> MountedScreen {
        let ctx = &self.ctx;
        match target {
            ScreenName::EmergencyNumber => MountedScreen::EmergencyNumber(
                EmergencyNumberScreen::mount(
                    SqlitePreferenceRepository::new(&self.conn),
                    ctx.notifier.clone(),
                ),
            ),
            ScreenName::Contacts => MountedScreen::Contacts(ContactDirectoryScreen::mount(
                ctx.runtime.clone(),
                ctx.contacts.clone(),
                ctx.notifier.clone(),
            )),
            ScreenName::WeatherAndTime => MountedScreen::WeatherAndTime(EnvironmentScreen::mount(
                ctx.runtime.clone(),
                EnvironmentDeps {
                    location: ctx.location.clone(),
                    weather: ctx.weather.clone(),
                    clock: ctx.clock.clone(),
                },
                ctx.notifier.clone(),
            )),
            ScreenName::About => MountedScreen::About(ScanScreen::mount(
                ctx.runtime.clone(),
                ctx.camera.clone(),
                ctx.notifier.clone(),
            )),
        }
    }
}
