//! Contact directory screen.
//!
//! # Responsibility
//! - Request address-book access once per mount and list every contact.
//!
//! # Invariants
//! - Rows keep provider order; no client-side sort.
//! - Contacts without phone numbers still get a row, with a blank subtitle.
//! - Denial and fetch failure each end with an empty list and one notification.

use crate::capability::{acquire, CapabilityError, ContactsProvider, DeviceCapability};
use crate::model::contact::ContactRow;
use crate::model::notification::{
    Notification, Notifier, MSG_CONTACTS_DENIED, MSG_CONTACTS_FAILED,
};
use crate::task::{ScopedState, ScreenScope};
use log::{info, warn};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactsPhase {
    Loading,
    Ready,
    Denied,
    Failed,
}

impl ContactsPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Denied => "denied",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDirectoryState {
    pub phase: ContactsPhase,
    pub rows: Vec<ContactRow>,
}

impl Default for ContactDirectoryState {
    fn default() -> Self {
        Self {
            phase: ContactsPhase::Loading,
            rows: Vec::new(),
        }
    }
}

/// Outcome of one permission + fetch sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactsLoad {
    pub phase: ContactsPhase,
    pub rows: Vec<ContactRow>,
    /// Notification owed to the user, if any.
    pub notification: Option<Notification>,
}

/// Runs the permission request and contact fetch.
pub async fn load_contacts<P>(provider: &P) -> ContactsLoad
where
    P: ContactsProvider + ?Sized,
{
    let grant = match acquire(provider).await {
        Ok(grant) => grant,
        Err(CapabilityError::Denied(_)) => {
            return ContactsLoad::empty(ContactsPhase::Denied, MSG_CONTACTS_DENIED);
        }
        Err(_) => return ContactsLoad::empty(ContactsPhase::Failed, MSG_CONTACTS_FAILED),
    };

    let fetched = match grant.ensure(DeviceCapability::Contacts) {
        Ok(()) => provider.fetch_contacts(&grant).await,
        Err(err) => Err(err),
    };
    match fetched {
        Ok(records) => {
            info!(
                "event=contacts_load module=screen status=ok count={}",
                records.len()
            );
            ContactsLoad {
                phase: ContactsPhase::Ready,
                rows: records.iter().map(ContactRow::from).collect(),
                notification: None,
            }
        }
        Err(err) => {
            warn!("event=contacts_load module=screen status=error error={err}");
            ContactsLoad::empty(ContactsPhase::Failed, MSG_CONTACTS_FAILED)
        }
    }
}

impl ContactsLoad {
    fn empty(phase: ContactsPhase, message: &str) -> Self {
        Self {
            phase,
            rows: Vec::new(),
            notification: Some(Notification::error(message)),
        }
    }
}

/// Mounted contact directory.
#[derive(Debug)]
pub struct ContactDirectoryScreen {
    state: watch::Receiver<ContactDirectoryState>,
    scope: ScreenScope,
}

impl ContactDirectoryScreen {
    /// Mounts the screen and starts loading in the background.
    pub fn mount(runtime: Handle, provider: Arc<dyn ContactsProvider>, notifier: Notifier) -> Self {
        let (tx, rx) = watch::channel(ContactDirectoryState::default());
        let mut scope = ScreenScope::new("contacts", runtime);
        let state = scope.bind(tx);
        scope.spawn(run_load(provider, state, notifier));
        Self { state: rx, scope }
    }

    pub fn state(&self) -> ContactDirectoryState {
        self.state.borrow().clone()
    }

    pub fn rows(&self) -> Vec<ContactRow> {
        self.state.borrow().rows.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ContactDirectoryState> {
        self.state.clone()
    }

    pub fn unmount(mut self) {
        self.scope.close();
    }
}

async fn run_load(
    provider: Arc<dyn ContactsProvider>,
    state: ScopedState<ContactDirectoryState>,
    notifier: Notifier,
) {
    let outcome = load_contacts(provider.as_ref()).await;
    if let Some(notification) = outcome.notification {
        state.notify(&notifier, notification);
    }
    state.update(|current| {
        current.phase = outcome.phase;
        current.rows = outcome.rows;
    });
}
