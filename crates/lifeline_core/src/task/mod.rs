//! Screen-scoped asynchronous work.
//!
//! # Responsibility
//! - Tie every spawned task to the lifetime of the screen that started it.
//! - Drop late results once that screen is gone.
//!
//! # Invariants
//! - Closing (or dropping) a scope cancels its token and aborts its tasks.
//! - A [`ScopedState`] never publishes and never notifies after cancellation.

use crate::model::notification::{Notification, Notifier};
use log::debug;
use std::future::Future;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Owner of one screen mount's background tasks.
#[derive(Debug)]
pub struct ScreenScope {
    name: &'static str,
    runtime: Handle,
    token: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl ScreenScope {
    pub fn new(name: &'static str, runtime: Handle) -> Self {
        debug!("event=screen_mount module=task status=ok screen={name}");
        Self {
            name,
            runtime,
            token: CancellationToken::new(),
            tasks: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Token observed by every task in this scope.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Wraps a state sender so writes stop once this scope closes.
    pub fn bind<T>(&self, tx: watch::Sender<T>) -> ScopedState<T> {
        ScopedState {
            tx,
            token: self.token.clone(),
        }
    }

    /// Spawns `future` on the runtime; it is dropped at its next await point
    /// after the scope closes.
    pub fn spawn<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.token.clone();
        let handle = self.runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {}
                _ = future => {}
            }
        });
        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(handle);
    }

    /// Cancels every task. Idempotent.
    pub fn close(&mut self) {
        if self.tasks.is_empty() && self.token.is_cancelled() {
            return;
        }
        self.token.cancel();
        for task in self.tasks.drain(..) {
            task.abort();
        }
        debug!(
            "event=screen_unmount module=task status=ok screen={}",
            self.name
        );
    }
}

impl Drop for ScreenScope {
    fn drop(&mut self) {
        self.close();
    }
}

/// Scope-guarded writer for one screen's published state.
#[derive(Debug)]
pub struct ScopedState<T> {
    tx: watch::Sender<T>,
    token: CancellationToken,
}

impl<T> ScopedState<T> {
    pub fn is_live(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Applies `modify` and wakes observers; returns `false` (and does
    /// nothing) once the owning scope has closed.
    pub fn update(&self, modify: impl FnOnce(&mut T)) -> bool {
        if !self.is_live() {
            return false;
        }
        self.tx.send_modify(modify);
        true
    }

    /// Sends `notification` unless the owning scope has closed.
    pub fn notify(&self, notifier: &Notifier, notification: Notification) -> bool {
        if !self.is_live() {
            return false;
        }
        notifier.notify(notification);
        true
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}
