//! Weather and time screen.
//!
//! # Responsibility
//! - Tick the displayed clock every second while mounted.
//! - Look up position and temperature once per mount.
//!
//! # Invariants
//! - The clock keeps ticking whatever the lookup outcome.
//! - A location denial means no weather request is made.
//! - Any lookup failure emits exactly one notification and leaves both the
//!   coordinate and the temperature unset.
//! - Unmounting stops the clock; late lookup results are discarded.

use crate::capability::{
    acquire, AccessGrant, CapabilityError, DeviceCapability, LocationProvider,
};
use crate::model::environment::{Coordinate, EnvironmentSnapshot};
use crate::model::notification::{Notification, Notifier, MSG_LOCATION_DENIED, MSG_WEATHER_FAILED};
use crate::service::weather::WeatherClient;
use crate::task::{ScopedState, ScreenScope};
use chrono::{DateTime, Local};
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Wall-clock source.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Lookup progress for one mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentPhase {
    Idle,
    PermissionRequested,
    Granted,
    Fetching,
    Ready,
    /// Location permission refused; terminal for this mount.
    Denied,
    /// Position or weather lookup failed; terminal for this mount.
    Failed,
}

impl EnvironmentPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PermissionRequested => "permission_requested",
            Self::Granted => "granted",
            Self::Fetching => "fetching",
            Self::Ready => "ready",
            Self::Denied => "denied",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentState {
    pub phase: EnvironmentPhase,
    pub snapshot: EnvironmentSnapshot,
    /// Clock refreshes since mount.
    pub ticks: u64,
}

/// External collaborators of the environment screen.
#[derive(Clone)]
pub struct EnvironmentDeps {
    pub location: Arc<dyn LocationProvider>,
    pub weather: Arc<dyn WeatherClient>,
    pub clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for EnvironmentDeps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentDeps").finish_non_exhaustive()
    }
}

/// Mounted weather and time screen.
#[derive(Debug)]
pub struct EnvironmentScreen {
    state: watch::Receiver<EnvironmentState>,
    scope: ScreenScope,
}

impl EnvironmentScreen {
    /// Mounts the screen, starting the clock and the one-shot lookup.
    pub fn mount(runtime: Handle, deps: EnvironmentDeps, notifier: Notifier) -> Self {
        let initial = EnvironmentState {
            phase: EnvironmentPhase::Idle,
            snapshot: EnvironmentSnapshot::new(deps.clock.now()),
            ticks: 0,
        };
        let (tx, rx) = watch::channel(initial);
        let mut scope = ScreenScope::new("environment", runtime);

        scope.spawn(run_clock(deps.clock.clone(), scope.bind(tx.clone())));
        scope.spawn(run_lookup(
            deps.location,
            deps.weather,
            scope.bind(tx),
            notifier,
        ));

        Self { state: rx, scope }
    }

    pub fn state(&self) -> EnvironmentState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<EnvironmentState> {
        self.state.clone()
    }

    pub fn unmount(mut self) {
        self.scope.close();
    }
}

async fn run_clock(clock: Arc<dyn Clock>, state: ScopedState<EnvironmentState>) {
    let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let now = clock.now();
        let published = state.update(|current| {
            current.snapshot.now = now;
            current.ticks += 1;
        });
        if !published {
            break;
        }
    }
}

async fn run_lookup(
    location: Arc<dyn LocationProvider>,
    weather: Arc<dyn WeatherClient>,
    state: ScopedState<EnvironmentState>,
    notifier: Notifier,
) {
    let set_phase = |phase: EnvironmentPhase| {
        state.update(|current| current.phase = phase);
    };

    set_phase(EnvironmentPhase::PermissionRequested);
    let grant = match acquire(location.as_ref()).await {
        Ok(grant) => grant,
        Err(CapabilityError::Denied(_)) => {
            set_phase(EnvironmentPhase::Denied);
            state.notify(&notifier, Notification::error(MSG_LOCATION_DENIED));
            return;
        }
        Err(err) => {
            warn!("event=environment_load module=screen status=error stage=permission error={err}");
            set_phase(EnvironmentPhase::Failed);
            state.notify(&notifier, Notification::error(MSG_WEATHER_FAILED));
            return;
        }
    };
    set_phase(EnvironmentPhase::Granted);

    set_phase(EnvironmentPhase::Fetching);
    match fetch_conditions(location.as_ref(), weather.as_ref(), &grant).await {
        Ok((coordinate, temperature)) => {
            info!("event=environment_load module=screen status=ok");
            state.update(|current| {
                current.phase = EnvironmentPhase::Ready;
                current.snapshot.coordinate = Some(coordinate);
                current.snapshot.temperature_c = Some(temperature);
            });
        }
        Err(err) => {
            warn!("event=environment_load module=screen status=error stage=fetch error={err}");
            set_phase(EnvironmentPhase::Failed);
            state.notify(&notifier, Notification::error(MSG_WEATHER_FAILED));
        }
    }
}

async fn fetch_conditions(
    location: &dyn LocationProvider,
    weather: &dyn WeatherClient,
    grant: &AccessGrant,
) -> Result<(Coordinate, f64), Box<dyn std::error::Error + Send + Sync>> {
    grant.ensure(DeviceCapability::Location)?;
    let coordinate = location.current_position(grant).await?;
    let temperature = weather.current_temperature(coordinate).await?;
    Ok((coordinate, temperature))
}
