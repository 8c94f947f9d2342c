//! Permission-gated device capability providers.
//!
//! # Responsibility
//! - Name the device resources the app touches (contacts, location, camera).
//! - Force every provider query through an explicit grant step.
//!
//! # Invariants
//! - Query methods require an [`AccessGrant`], which only [`acquire`] can mint,
//!   and only after the provider answered [`PermissionStatus::Granted`].
//! - A denied or failed permission request never reaches a query method.

mod grant;
mod host;
mod kind;
mod provider;

pub use grant::{acquire, AccessGrant};
pub use host::{HostBridge, HostCamera, HostContacts, HostLocation, HostRequest};
pub use kind::{
    parse_device_capability, supported_device_capability_strings, DeviceCapability,
    DeviceCapabilityParseError, DEVICE_CAPABILITY_CAMERA, DEVICE_CAPABILITY_CONTACTS,
    DEVICE_CAPABILITY_LOCATION,
};
pub use provider::{
    CameraProvider, CapabilityError, CapabilityProvider, CapabilityResult, ContactsProvider,
    LocationProvider, PermissionStatus, ScanStream,
};
