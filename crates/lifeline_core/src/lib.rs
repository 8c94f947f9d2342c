//! Core application logic for Lifeline.
//! Screens, navigation and device/network access live here; the mobile host
//! only renders state and forwards user input.

pub mod capability;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod screen;
pub mod service;
pub mod shell;
pub mod task;

pub use capability::{
    acquire, AccessGrant, CameraProvider, CapabilityError, CapabilityProvider, CapabilityResult,
    ContactsProvider, DeviceCapability, HostBridge, HostRequest, LocationProvider,
    PermissionStatus, ScanStream,
};
pub use config::{AppConfig, ConfigError, WeatherConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{ContactRecord, ContactRow, PhoneNumber};
pub use model::environment::{Coordinate, EnvironmentSnapshot};
pub use model::notification::{Notification, NotificationFeed, NotificationLevel, Notifier};
pub use model::scan::{ScanEvent, ScanResult};
pub use repo::preference_repo::{
    PreferenceRepository, RepoError, RepoResult, SqlitePreferenceRepository,
};
pub use screen::navigation::{HeaderAction, Navigator};
pub use screen::{parse_screen_name, NavigationError, ScreenName};
pub use service::preference_service::{PreferenceService, EMERGENCY_NUMBER_KEY};
pub use service::weather::{OpenWeatherClient, WeatherClient, WeatherError, WeatherResult};
pub use shell::{AppContext, AppShell, MountedScreen};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
