//! Transient environment snapshot: clock, position, temperature.

use chrono::{DateTime, Local};

/// Geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `"Location: {lat}, {lon}"` rounded to two decimals.
    pub fn display(&self) -> String {
        format!("Location: {:.2}, {:.2}", self.latitude, self.longitude)
    }
}

/// Everything the environment screen shows.
///
/// `now` ticks independently of the one-shot `coordinate`/`temperature_c`
/// lookup; the two writers never touch each other's fields.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentSnapshot {
    pub now: DateTime<Local>,
    pub coordinate: Option<Coordinate>,
    pub temperature_c: Option<f64>,
}

impl EnvironmentSnapshot {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now,
            coordinate: None,
            temperature_c: None,
        }
    }

    pub fn display_time(&self) -> String {
        self.now.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn display_temperature(&self) -> Option<String> {
        self.temperature_c
            .map(|temperature| format!("Temperature: {temperature}°C"))
    }

    pub fn display_location(&self) -> Option<String> {
        self.coordinate.as_ref().map(Coordinate::display)
    }
}

#[cfg(test)]
mod tests {
    use super::{Coordinate, EnvironmentSnapshot};
    use chrono::{Local, TimeZone};

    #[test]
    fn location_rounds_to_two_decimals() {
        let coordinate = Coordinate::new(52.520008, 13.404954);
        assert_eq!(coordinate.display(), "Location: 52.52, 13.40");
    }

    #[test]
    fn unset_fields_render_nothing() {
        let now = Local
            .with_ymd_and_hms(2024, 3, 9, 7, 5, 1)
            .single()
            .expect("unambiguous local time");
        let snapshot = EnvironmentSnapshot::new(now);
        assert_eq!(snapshot.display_time(), "2024-03-09 07:05:01");
        assert_eq!(snapshot.display_temperature(), None);
        assert_eq!(snapshot.display_location(), None);
    }

    #[test]
    fn temperature_renders_celsius() {
        let mut snapshot = EnvironmentSnapshot::new(Local::now());
        snapshot.temperature_c = Some(21.5);
        assert_eq!(
            snapshot.display_temperature().as_deref(),
            Some("Temperature: 21.5°C")
        );
    }
}
