//! Device capability identifiers.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Device resource guarded by a platform permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeviceCapability {
    Contacts,
    Location,
    Camera,
}

impl DeviceCapability {
    /// Stable id used in logs and host bridge payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contacts => DEVICE_CAPABILITY_CONTACTS,
            Self::Location => DEVICE_CAPABILITY_LOCATION,
            Self::Camera => DEVICE_CAPABILITY_CAMERA,
        }
    }

    /// Rationale shown next to the platform permission prompt.
    pub fn description(self) -> &'static str {
        match self {
            Self::Contacts => "Read the address book to list your contacts.",
            Self::Location => "Read your foreground location to look up local weather.",
            Self::Camera => "Use the camera to scan QR codes.",
        }
    }
}

impl Display for DeviceCapability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEVICE_CAPABILITY_CONTACTS: &str = "contacts";
pub const DEVICE_CAPABILITY_LOCATION: &str = "location";
pub const DEVICE_CAPABILITY_CAMERA: &str = "camera";

const SUPPORTED_DEVICE_CAPABILITY_STRINGS: &[&str] = &[
    DEVICE_CAPABILITY_CONTACTS,
    DEVICE_CAPABILITY_LOCATION,
    DEVICE_CAPABILITY_CAMERA,
];

pub fn supported_device_capability_strings() -> &'static [&'static str] {
    SUPPORTED_DEVICE_CAPABILITY_STRINGS
}

/// Parses a capability id. Matching is exact and case-sensitive.
pub fn parse_device_capability(value: &str) -> Result<DeviceCapability, DeviceCapabilityParseError> {
    match value.trim() {
        "" => Err(DeviceCapabilityParseError::Empty),
        DEVICE_CAPABILITY_CONTACTS => Ok(DeviceCapability::Contacts),
        DEVICE_CAPABILITY_LOCATION => Ok(DeviceCapability::Location),
        DEVICE_CAPABILITY_CAMERA => Ok(DeviceCapability::Camera),
        other => Err(DeviceCapabilityParseError::Unsupported(other.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCapabilityParseError {
    Empty,
    Unsupported(String),
}

impl Display for DeviceCapabilityParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "device capability value must not be empty"),
            Self::Unsupported(value) => write!(f, "device capability is unsupported: {value}"),
        }
    }
}

impl Error for DeviceCapabilityParseError {}
