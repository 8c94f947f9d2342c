//! Hand-written fake providers shared by integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use lifeline_core::model::environment::Coordinate;
use lifeline_core::{
    AccessGrant, CameraProvider, CapabilityError, CapabilityProvider, CapabilityResult,
    ContactRecord, ContactsProvider, DeviceCapability, LocationProvider, PermissionStatus,
    ScanEvent, ScanStream, WeatherClient, WeatherError, WeatherResult,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

pub struct FakeContacts {
    pub permission: CapabilityResult<PermissionStatus>,
    pub contacts: CapabilityResult<Vec<ContactRecord>>,
    pub fetch_calls: AtomicUsize,
}

impl FakeContacts {
    pub fn granted(contacts: Vec<ContactRecord>) -> Self {
        Self {
            permission: Ok(PermissionStatus::Granted),
            contacts: Ok(contacts),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    pub fn denied() -> Self {
        Self {
            permission: Ok(PermissionStatus::Denied),
            contacts: Ok(Vec::new()),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_fetch() -> Self {
        Self {
            permission: Ok(PermissionStatus::Granted),
            contacts: Err(CapabilityError::Provider("address book locked".to_string())),
            fetch_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CapabilityProvider for FakeContacts {
    fn capability(&self) -> DeviceCapability {
        DeviceCapability::Contacts
    }

    async fn request_access(&self) -> CapabilityResult<PermissionStatus> {
        self.permission.clone()
    }
}

#[async_trait]
impl ContactsProvider for FakeContacts {
    async fn fetch_contacts(&self, grant: &AccessGrant) -> CapabilityResult<Vec<ContactRecord>> {
        assert_eq!(grant.capability(), DeviceCapability::Contacts);
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.contacts.clone()
    }
}

pub struct FakeLocation {
    pub permission: CapabilityResult<PermissionStatus>,
    pub position: CapabilityResult<Coordinate>,
    pub position_calls: AtomicUsize,
}

impl FakeLocation {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            permission: Ok(PermissionStatus::Granted),
            position: Ok(Coordinate::new(latitude, longitude)),
            position_calls: AtomicUsize::new(0),
        }
    }

    pub fn denied() -> Self {
        Self {
            permission: Ok(PermissionStatus::Denied),
            position: Err(CapabilityError::Denied(DeviceCapability::Location)),
            position_calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            permission: Ok(PermissionStatus::Granted),
            position: Err(CapabilityError::Unavailable(DeviceCapability::Location)),
            position_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CapabilityProvider for FakeLocation {
    fn capability(&self) -> DeviceCapability {
        DeviceCapability::Location
    }

    async fn request_access(&self) -> CapabilityResult<PermissionStatus> {
        self.permission.clone()
    }
}

#[async_trait]
impl LocationProvider for FakeLocation {
    async fn current_position(&self, _grant: &AccessGrant) -> CapabilityResult<Coordinate> {
        self.position_calls.fetch_add(1, Ordering::SeqCst);
        self.position.clone()
    }
}

/// Weather fake; `temperature: None` answers with HTTP 503.
pub struct FakeWeather {
    pub temperature: Option<f64>,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
}

impl FakeWeather {
    pub fn reporting(temperature: f64) -> Self {
        Self {
            temperature: Some(temperature),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            temperature: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn slow(temperature: f64, delay: Duration) -> Self {
        Self {
            temperature: Some(temperature),
            delay: Some(delay),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherClient for FakeWeather {
    async fn current_temperature(&self, _coordinate: Coordinate) -> WeatherResult<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.temperature.ok_or(WeatherError::Status(503))
    }
}

/// Camera fake fed by the returned sender.
pub struct FakeCamera {
    pub permission: PermissionStatus,
    stream: Mutex<Option<ScanStream>>,
}

impl FakeCamera {
    pub fn granted() -> (Self, mpsc::Sender<ScanEvent>) {
        let (tx, rx) = mpsc::channel(8);
        let camera = Self {
            permission: PermissionStatus::Granted,
            stream: Mutex::new(Some(rx)),
        };
        (camera, tx)
    }

    pub fn denied() -> Self {
        Self {
            permission: PermissionStatus::Denied,
            stream: Mutex::new(None),
        }
    }
}

#[async_trait]
impl CapabilityProvider for FakeCamera {
    fn capability(&self) -> DeviceCapability {
        DeviceCapability::Camera
    }

    async fn request_access(&self) -> CapabilityResult<PermissionStatus> {
        Ok(self.permission)
    }
}

#[async_trait]
impl CameraProvider for FakeCamera {
    async fn open_scanner(&self, _grant: &AccessGrant) -> CapabilityResult<ScanStream> {
        self.stream
            .lock()
            .expect("camera stream lock")
            .take()
            .ok_or(CapabilityError::Unavailable(DeviceCapability::Camera))
    }
}
