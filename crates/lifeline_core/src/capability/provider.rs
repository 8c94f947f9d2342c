//! Provider contracts implemented by the host platform bridge.

use super::grant::AccessGrant;
use super::kind::DeviceCapability;
use crate::model::contact::ContactRecord;
use crate::model::environment::Coordinate;
use crate::model::scan::ScanEvent;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};
use tokio::sync::mpsc;

pub type CapabilityResult<T> = Result<T, CapabilityError>;

/// Decoder stream handed out by [`CameraProvider::open_scanner`].
pub type ScanStream = mpsc::Receiver<ScanEvent>;

/// Answer to a permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Provider-level failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    /// The user refused the permission prompt.
    Denied(DeviceCapability),
    /// The device has no such resource (no camera, location services off).
    Unavailable(DeviceCapability),
    /// The platform bridge failed while answering.
    Provider(String),
    /// A grant minted for one capability was presented to another.
    GrantMismatch {
        expected: DeviceCapability,
        granted: DeviceCapability,
    },
}

impl Display for CapabilityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Denied(capability) => write!(f, "{capability} permission denied"),
            Self::Unavailable(capability) => write!(f, "{capability} is unavailable on this device"),
            Self::Provider(message) => write!(f, "capability provider failed: {message}"),
            Self::GrantMismatch { expected, granted } => {
                write!(f, "{granted} grant cannot unlock {expected}")
            }
        }
    }
}

impl Error for CapabilityError {}

/// Common permission surface of every device provider.
#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    fn capability(&self) -> DeviceCapability;

    /// Shows (or answers from cache) the platform permission prompt.
    async fn request_access(&self) -> CapabilityResult<PermissionStatus>;
}

/// Address-book access.
#[async_trait]
pub trait ContactsProvider: CapabilityProvider {
    /// All contacts with phone numbers populated, in provider order.
    async fn fetch_contacts(&self, grant: &AccessGrant) -> CapabilityResult<Vec<ContactRecord>>;
}

/// Foreground location access.
#[async_trait]
pub trait LocationProvider: CapabilityProvider {
    /// One-shot current position.
    async fn current_position(&self, grant: &AccessGrant) -> CapabilityResult<Coordinate>;
}

/// Camera-backed barcode decoding.
#[async_trait]
pub trait CameraProvider: CapabilityProvider {
    /// Starts the camera feed; every decoded barcode arrives on the stream.
    async fn open_scanner(&self, grant: &AccessGrant) -> CapabilityResult<ScanStream>;
}
