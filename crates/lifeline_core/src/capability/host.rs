//! Providers answered by the mobile host.
//!
//! # Responsibility
//! - Turn provider calls made by screens into requests the host can poll.
//! - Route host answers back to the waiting screen task.
//!
//! # Invariants
//! - At most one open request per [`HostRequest`]; a newer request for the
//!   same slot abandons the older one.
//! - Answers without a matching open request are rejected, never queued.
//! - Scan events only flow while a scanner stream is open.

use super::grant::AccessGrant;
use super::kind::{parse_device_capability, DeviceCapability};
use super::provider::{
    CameraProvider, CapabilityError, CapabilityProvider, CapabilityResult, ContactsProvider,
    LocationProvider, PermissionStatus, ScanStream,
};
use crate::model::contact::ContactRecord;
use crate::model::environment::Coordinate;
use crate::model::scan::ScanEvent;
use async_trait::async_trait;
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, oneshot};

const SCAN_BUFFER: usize = 16;

/// Something a screen is waiting for the host to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostRequest {
    Permission(DeviceCapability),
    Contacts,
    Position,
}

impl HostRequest {
    /// Stable id: `permission:<capability>`, `contacts` or `position`.
    pub fn id(self) -> String {
        match self {
            Self::Permission(capability) => format!("permission:{}", capability.as_str()),
            Self::Contacts => "contacts".to_string(),
            Self::Position => "position".to_string(),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "contacts" => Some(Self::Contacts),
            "position" => Some(Self::Position),
            other => other
                .strip_prefix("permission:")
                .and_then(|capability| parse_device_capability(capability).ok())
                .map(Self::Permission),
        }
    }
}

impl Display for HostRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id())
    }
}

enum Reply {
    Permission(oneshot::Sender<CapabilityResult<PermissionStatus>>),
    Contacts(oneshot::Sender<CapabilityResult<Vec<ContactRecord>>>),
    Position(oneshot::Sender<CapabilityResult<Coordinate>>),
}

impl Reply {
    /// The waiting task is gone (its screen unmounted).
    fn is_abandoned(&self) -> bool {
        match self {
            Self::Permission(tx) => tx.is_closed(),
            Self::Contacts(tx) => tx.is_closed(),
            Self::Position(tx) => tx.is_closed(),
        }
    }
}

/// Shared mailbox between screen tasks and the host.
#[derive(Default)]
pub struct HostBridge {
    open: Mutex<HashMap<HostRequest, Reply>>,
    scanner: Mutex<Option<mpsc::Sender<ScanEvent>>>,
}

impl std::fmt::Debug for HostBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostBridge")
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}

impl HostBridge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Requests currently waiting for an answer. Requests whose screen has
    /// unmounted are dropped here.
    pub fn pending(&self) -> Vec<HostRequest> {
        let mut open = self.open();
        open.retain(|_, reply| !reply.is_abandoned());
        let mut requests: Vec<HostRequest> = open.keys().copied().collect();
        drop(open);
        requests.sort_by_key(|request| request.id());
        requests
    }

    pub fn answer_permission(
        &self,
        capability: DeviceCapability,
        answer: CapabilityResult<PermissionStatus>,
    ) -> bool {
        match self.take(HostRequest::Permission(capability)) {
            Some(Reply::Permission(tx)) => tx.send(answer).is_ok(),
            _ => false,
        }
    }

    pub fn provide_contacts(&self, answer: CapabilityResult<Vec<ContactRecord>>) -> bool {
        match self.take(HostRequest::Contacts) {
            Some(Reply::Contacts(tx)) => tx.send(answer).is_ok(),
            _ => false,
        }
    }

    pub fn provide_position(&self, answer: CapabilityResult<Coordinate>) -> bool {
        match self.take(HostRequest::Position) {
            Some(Reply::Position(tx)) => tx.send(answer).is_ok(),
            _ => false,
        }
    }

    /// Fails `request` with a provider error.
    pub fn reject(&self, request: HostRequest, message: &str) -> bool {
        let failure = CapabilityError::Provider(message.to_string());
        match request {
            HostRequest::Permission(capability) => self.answer_permission(capability, Err(failure)),
            HostRequest::Contacts => self.provide_contacts(Err(failure)),
            HostRequest::Position => self.provide_position(Err(failure)),
        }
    }

    /// Forwards a decoded barcode to the open scanner, if any.
    pub fn push_scan(&self, event: ScanEvent) -> bool {
        let Some(tx) = lock(&self.scanner).clone() else {
            return false;
        };
        tx.try_send(event).is_ok()
    }

    pub fn contacts(self: &Arc<Self>) -> HostContacts {
        HostContacts(self.clone())
    }

    pub fn location(self: &Arc<Self>) -> HostLocation {
        HostLocation(self.clone())
    }

    pub fn camera(self: &Arc<Self>) -> HostCamera {
        HostCamera(self.clone())
    }

    fn open(&self) -> MutexGuard<'_, HashMap<HostRequest, Reply>> {
        lock(&self.open)
    }

    fn take(&self, request: HostRequest) -> Option<Reply> {
        let reply = self.open().remove(&request);
        if reply.is_none() {
            warn!("event=host_answer module=capability status=error request={request} reason=not_pending");
        }
        reply
    }

    async fn ask<T>(
        &self,
        request: HostRequest,
        wrap: fn(oneshot::Sender<CapabilityResult<T>>) -> Reply,
    ) -> CapabilityResult<T> {
        let (tx, rx) = oneshot::channel();
        let replaced = self.open().insert(request, wrap(tx)).is_some();
        debug!("event=host_request module=capability status=start request={request} replaced={replaced}");
        rx.await
            .map_err(|_| CapabilityError::Provider(format!("host abandoned {request}")))?
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn ask_permission(
    bridge: &HostBridge,
    capability: DeviceCapability,
) -> CapabilityResult<PermissionStatus> {
    bridge
        .ask(HostRequest::Permission(capability), Reply::Permission)
        .await
}

/// Address book answered by the host.
#[derive(Debug, Clone)]
pub struct HostContacts(Arc<HostBridge>);

#[async_trait]
impl CapabilityProvider for HostContacts {
    fn capability(&self) -> DeviceCapability {
        DeviceCapability::Contacts
    }

    async fn request_access(&self) -> CapabilityResult<PermissionStatus> {
        ask_permission(&self.0, DeviceCapability::Contacts).await
    }
}

#[async_trait]
impl ContactsProvider for HostContacts {
    async fn fetch_contacts(&self, grant: &AccessGrant) -> CapabilityResult<Vec<ContactRecord>> {
        grant.ensure(DeviceCapability::Contacts)?;
        self.0.ask(HostRequest::Contacts, Reply::Contacts).await
    }
}

/// Position fixes answered by the host.
#[derive(Debug, Clone)]
pub struct HostLocation(Arc<HostBridge>);

#[async_trait]
impl CapabilityProvider for HostLocation {
    fn capability(&self) -> DeviceCapability {
        DeviceCapability::Location
    }

    async fn request_access(&self) -> CapabilityResult<PermissionStatus> {
        ask_permission(&self.0, DeviceCapability::Location).await
    }
}

#[async_trait]
impl LocationProvider for HostLocation {
    async fn current_position(&self, grant: &AccessGrant) -> CapabilityResult<Coordinate> {
        grant.ensure(DeviceCapability::Location)?;
        self.0.ask(HostRequest::Position, Reply::Position).await
    }
}

/// Camera decoder fed through [`HostBridge::push_scan`].
#[derive(Debug, Clone)]
pub struct HostCamera(Arc<HostBridge>);

#[async_trait]
impl CapabilityProvider for HostCamera {
    fn capability(&self) -> DeviceCapability {
        DeviceCapability::Camera
    }

    async fn request_access(&self) -> CapabilityResult<PermissionStatus> {
        ask_permission(&self.0, DeviceCapability::Camera).await
    }
}

#[async_trait]
impl CameraProvider for HostCamera {
    async fn open_scanner(&self, grant: &AccessGrant) -> CapabilityResult<ScanStream> {
        grant.ensure(DeviceCapability::Camera)?;
        let (tx, rx) = mpsc::channel(SCAN_BUFFER);
        *lock(&self.0.scanner) = Some(tx);
        Ok(rx)
    }
}
