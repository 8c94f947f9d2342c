//! QR code scan screen.
//!
//! # Responsibility
//! - Request camera access once per mount.
//! - Accept one decoded barcode per scan session and show it verbatim.
//!
//! # Invariants
//! - `Denied` is terminal for the mount.
//! - While `Scanned`, decoder events are ignored until
//!   [`ScanScreen::reset_to_scanning`] re-arms the session.
//! - Payloads are never parsed, validated, persisted or logged.

use crate::capability::{acquire, CameraProvider, DeviceCapability, ScanStream};
use crate::model::notification::{Notification, Notifier, TITLE_SCANNED};
use crate::model::scan::{ScanEvent, ScanResult};
use crate::task::{ScopedState, ScreenScope};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;

pub const TEXT_AWAITING_PERMISSION: &str = "Requesting for camera permission";
pub const TEXT_DENIED: &str = "No access to camera";
pub const TEXT_SCANNING: &str = "Scan QR Code of another app";
pub const RESET_BUTTON_TITLE: &str = "Tap to Scan Again";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanPhase {
    AwaitingPermission,
    Denied,
    Scanning,
    Scanned(ScanResult),
}

impl ScanPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingPermission => "awaiting_permission",
            Self::Denied => "denied",
            Self::Scanning => "scanning",
            Self::Scanned(_) => "scanned",
        }
    }
}

/// Scan state machine, independent of any camera or runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSession {
    phase: ScanPhase,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSession {
    pub fn new() -> Self {
        Self {
            phase: ScanPhase::AwaitingPermission,
        }
    }

    pub fn phase(&self) -> &ScanPhase {
        &self.phase
    }

    pub fn result(&self) -> Option<&ScanResult> {
        match &self.phase {
            ScanPhase::Scanned(result) => Some(result),
            _ => None,
        }
    }

    /// Applies the permission answer. Only meaningful while awaiting it.
    pub fn on_permission(&mut self, granted: bool) {
        if self.phase == ScanPhase::AwaitingPermission {
            self.phase = if granted {
                ScanPhase::Scanning
            } else {
                ScanPhase::Denied
            };
        }
    }

    /// Records `event` when armed; returns whether it was accepted.
    pub fn on_decoded(&mut self, event: ScanEvent) -> bool {
        if self.phase != ScanPhase::Scanning {
            return false;
        }
        self.phase = ScanPhase::Scanned(event);
        true
    }

    /// Clears the recorded result and re-arms the decoder.
    pub fn reset_to_scanning(&mut self) -> bool {
        if !matches!(self.phase, ScanPhase::Scanned(_)) {
            return false;
        }
        self.phase = ScanPhase::Scanning;
        true
    }

    pub fn is_armed(&self) -> bool {
        self.phase == ScanPhase::Scanning
    }

    pub fn status_text(&self) -> &'static str {
        match self.phase {
            ScanPhase::AwaitingPermission => TEXT_AWAITING_PERMISSION,
            ScanPhase::Denied => TEXT_DENIED,
            ScanPhase::Scanning | ScanPhase::Scanned(_) => TEXT_SCANNING,
        }
    }

    /// Reset button title, shown only after a scan.
    pub fn reset_action(&self) -> Option<&'static str> {
        self.result().map(|_| RESET_BUTTON_TITLE)
    }
}

/// Mounted scan screen.
#[derive(Debug)]
pub struct ScanScreen {
    state: watch::Receiver<ScanSession>,
    writer: ScopedState<ScanSession>,
    scope: ScreenScope,
}

impl ScanScreen {
    pub fn mount(runtime: Handle, camera: Arc<dyn CameraProvider>, notifier: Notifier) -> Self {
        let (tx, rx) = watch::channel(ScanSession::new());
        let mut scope = ScreenScope::new("scan", runtime);
        let writer = scope.bind(tx.clone());
        scope.spawn(run_scanner(camera, scope.bind(tx), notifier));
        Self {
            state: rx,
            writer,
            scope,
        }
    }

    pub fn session(&self) -> ScanSession {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ScanSession> {
        self.state.clone()
    }

    /// User tapped "Tap to Scan Again".
    pub fn reset_to_scanning(&self) -> bool {
        let mut reset = false;
        self.writer
            .update(|session| reset = session.reset_to_scanning());
        if reset {
            debug!("event=scan_reset module=screen status=ok");
        }
        reset
    }

    pub fn unmount(mut self) {
        self.scope.close();
    }
}

async fn run_scanner(
    camera: Arc<dyn CameraProvider>,
    state: ScopedState<ScanSession>,
    notifier: Notifier,
) {
    let stream = match open_stream(camera.as_ref()).await {
        Some(stream) => stream,
        None => {
            state.update(|session| session.on_permission(false));
            return;
        }
    };
    state.update(|session| session.on_permission(true));
    consume_events(stream, &state, &notifier).await;
}

async fn open_stream(camera: &dyn CameraProvider) -> Option<ScanStream> {
    let grant = acquire(camera).await.ok()?;
    let opened = match grant.ensure(DeviceCapability::Camera) {
        Ok(()) => camera.open_scanner(&grant).await,
        Err(err) => Err(err),
    };
    match opened {
        Ok(stream) => Some(stream),
        Err(err) => {
            warn!("event=scanner_open module=screen status=error error={err}");
            None
        }
    }
}

async fn consume_events(
    mut stream: ScanStream,
    state: &ScopedState<ScanSession>,
    notifier: &Notifier,
) {
    while let Some(event) = stream.recv().await {
        let data = event.data.clone();
        let kind = event.kind.clone();
        let mut accepted = false;
        if !state.update(|session| accepted = session.on_decoded(event)) {
            return;
        }
        if accepted {
            info!("event=scan_decoded module=screen status=ok kind={kind}");
            state.notify(notifier, Notification::info(TITLE_SCANNED, data));
        }
    }
    debug!("event=scanner_closed module=screen status=ok");
}
