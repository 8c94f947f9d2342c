//! The four screens and the navigation shell routing between them.
//!
//! # Responsibility
//! - Own per-screen state; nothing is shared between screens.
//! - Convert every failed platform or network call into one notification.
//!
//! # Invariants
//! - State is rebuilt on mount and discarded on unmount.
//! - Screens never propagate errors to their caller.

pub mod contacts;
pub mod emergency_number;
pub mod environment;
pub mod navigation;
pub mod scan;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Registered navigation destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenName {
    EmergencyNumber,
    Contacts,
    WeatherAndTime,
    About,
}

pub const SCREEN_EMERGENCY_NUMBER: &str = "Emergency Number";
pub const SCREEN_CONTACTS: &str = "Contacts";
pub const SCREEN_WEATHER_AND_TIME: &str = "Weather and Time";
pub const SCREEN_ABOUT: &str = "About";

impl ScreenName {
    /// Registration order; the first entry is the root screen.
    pub const ALL: [ScreenName; 4] = [
        ScreenName::EmergencyNumber,
        ScreenName::Contacts,
        ScreenName::WeatherAndTime,
        ScreenName::About,
    ];

    /// Route key, also used as the header title.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmergencyNumber => SCREEN_EMERGENCY_NUMBER,
            Self::Contacts => SCREEN_CONTACTS,
            Self::WeatherAndTime => SCREEN_WEATHER_AND_TIME,
            Self::About => SCREEN_ABOUT,
        }
    }

    /// Short id used in log events.
    pub fn log_id(self) -> &'static str {
        match self {
            Self::EmergencyNumber => "emergency_number",
            Self::Contacts => "contacts",
            Self::WeatherAndTime => "environment",
            Self::About => "scan",
        }
    }
}

impl Display for ScreenName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves a route key to a screen.
pub fn parse_screen_name(value: &str) -> Result<ScreenName, NavigationError> {
    ScreenName::ALL
        .into_iter()
        .find(|screen| screen.as_str() == value.trim())
        .ok_or_else(|| NavigationError::UnknownScreen(value.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    UnknownScreen(String),
}

impl Display for NavigationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownScreen(value) => write!(f, "no screen registered as `{value}`"),
        }
    }
}

impl Error for NavigationError {}

#[cfg(test)]
mod tests {
    use super::{parse_screen_name, NavigationError, ScreenName};

    #[test]
    fn route_keys_round_trip() {
        for screen in ScreenName::ALL {
            assert_eq!(parse_screen_name(screen.as_str()), Ok(screen));
        }
    }

    #[test]
    fn unknown_route_is_rejected() {
        assert_eq!(
            parse_screen_name("Settings"),
            Err(NavigationError::UnknownScreen("Settings".to_string()))
        );
    }
}
