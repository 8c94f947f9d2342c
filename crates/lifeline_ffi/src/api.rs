//! FFI use-case API for the mobile host.
//!
//! # Responsibility
//! - Expose the app shell (navigation, screens, notifications) to Dart via FRB.
//! - Relay host-side permission prompts, contacts, position fixes and
//!   decoded barcodes into the core.
//! - Map core failures to the same user-facing messages the screens use.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - Failures come back as `ok = false` envelopes or `false`, never as errors.
//! - At most one shell session runs per process.

use lifeline_core::capability::parse_device_capability;
use lifeline_core::db::open_db;
use lifeline_core::model::notification::{
    self, NotificationFeed, MSG_EMERGENCY_SAVED, MSG_LOAD_EMERGENCY_FAILED,
    MSG_SAVE_EMERGENCY_FAILED,
};
use lifeline_core::screen::environment::SystemClock;
use lifeline_core::screen::navigation::{HeaderAction, NavigationButton};
use lifeline_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AppConfig, AppContext, AppShell, ConfigError, ContactRecord, ContactRow, Coordinate,
    HostBridge, HostRequest, MountedScreen, Notification, NotificationLevel, OpenWeatherClient,
    PermissionStatus, PhoneNumber, PreferenceService, ScanEvent, ScreenName,
    SqlitePreferenceRepository,
};
use log::{info, warn};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tokio::runtime::Runtime;

static APP_CONFIG: OnceLock<Result<AppConfig, ConfigError>> = OnceLock::new();
static SHELL: Mutex<Option<ShellSession>> = Mutex::new(None);

const SHELL_WORKER_THREADS: usize = 2;
const SHELL_NOT_RUNNING: &str = "shell is not running; call shell_start first";

/// Health-check probe.
///
/// # FFI contract
/// - Sync, non-blocking, never throws.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Starts Rust core logging once per process.
///
/// # FFI contract
/// - Sync; may create the log directory.
/// - A blank `level` falls back to the configured `LIFELINE_LOG_LEVEL`.
/// - Idempotent for the same `level + log_dir`.
/// - Returns an empty string on success, the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let level = if level.trim().is_empty() {
        match app_config() {
            Ok(config) => config.log_level.clone(),
            Err(err) => return err,
        }
    } else {
        level
    };
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Route keys in registration order; the first one is the root screen.
#[flutter_rust_bridge::frb(sync)]
pub fn screen_titles() -> Vec<String> {
    ScreenName::ALL
        .iter()
        .map(|screen| screen.as_str().to_string())
        .collect()
}

/// Result of an emergency number load or save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceResponse {
    pub ok: bool,
    /// Stored value on a successful load; `None` when nothing was saved yet.
    pub value: Option<String>,
    /// User-facing notification text; empty when nothing should be shown.
    pub message: String,
}

/// Loads the stored emergency number.
///
/// # FFI contract
/// - Sync, DB-backed.
/// - On failure, `message` carries the load-failure notification text.
#[flutter_rust_bridge::frb(sync)]
pub fn emergency_number_load() -> PreferenceResponse {
    match app_config() {
        Ok(config) => load_emergency_number_at(&config.db_path),
        Err(err) => load_failed(&err),
    }
}

/// Stores `value` verbatim as the emergency number.
#[flutter_rust_bridge::frb(sync)]
pub fn emergency_number_save(value: String) -> PreferenceResponse {
    match app_config() {
        Ok(config) => save_emergency_number_at(&config.db_path, value),
        Err(err) => save_failed(&err),
    }
}

/// Contact as delivered by the host address-book plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactInput {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_numbers: Vec<String>,
}

impl From<ContactInput> for ContactRecord {
    fn from(input: ContactInput) -> Self {
        Self {
            id: input.id,
            first_name: input.first_name,
            last_name: input.last_name,
            phone_numbers: input.phone_numbers.into_iter().map(PhoneNumber::new).collect(),
        }
    }
}

/// One row of the contact list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRowView {
    pub id: String,
    pub title: String,
    pub subtitle: String,
}

impl From<ContactRow> for ContactRowView {
    fn from(row: ContactRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            subtitle: row.subtitle,
        }
    }
}

/// Projects host contacts into list rows, preserving order.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_rows(contacts: Vec<ContactInput>) -> Vec<ContactRowView> {
    contacts
        .into_iter()
        .map(|input| ContactRowView::from(ContactRow::from(&ContactRecord::from(input))))
        .collect()
}

/// Outcome of a shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellAck {
    pub ok: bool,
    /// Whether the command changed anything (e.g. navigation happened).
    pub changed: bool,
    pub message: String,
}

impl ShellAck {
    fn done(changed: bool) -> Self {
        Self {
            ok: true,
            changed,
            message: String::new(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            changed: false,
            message: message.into(),
        }
    }
}

/// Tappable navigation affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionView {
    pub title: String,
    /// Route key to pass to [`shell_navigate`].
    pub target: String,
}

impl From<HeaderAction> for ActionView {
    fn from(action: HeaderAction) -> Self {
        Self {
            title: action.title.to_string(),
            target: action.target.as_str().to_string(),
        }
    }
}

impl From<&NavigationButton> for ActionView {
    fn from(button: &NavigationButton) -> Self {
        Self {
            title: button.title.to_string(),
            target: button.target.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactsView {
    pub phase: String,
    pub rows: Vec<ContactRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentView {
    pub phase: String,
    pub time: String,
    pub temperature: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanView {
    pub phase: String,
    pub status: String,
    /// Raw payload of the accepted scan.
    pub result: Option<String>,
    pub reset_action: Option<String>,
}

/// Everything the host needs to render the visible screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellView {
    pub current: String,
    pub stack: Vec<String>,
    pub can_go_back: bool,
    pub header_action: Option<ActionView>,
    pub navigation_buttons: Vec<ActionView>,
    pub emergency_field: String,
    pub contacts: Option<ContactsView>,
    pub environment: Option<EnvironmentView>,
    pub scan: Option<ScanView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    /// `info` or `error`.
    pub level: String,
    pub title: String,
    pub message: String,
}

impl From<Notification> for NotificationView {
    fn from(notification: Notification) -> Self {
        let level = match notification.level {
            NotificationLevel::Info => "info",
            NotificationLevel::Error => "error",
        };
        Self {
            level: level.to_string(),
            title: notification.title,
            message: notification.message,
        }
    }
}

/// Starts the shell on the root screen. Idempotent.
///
/// # FFI contract
/// - Sync; opens the preference DB and a background runtime.
/// - Returns an empty string on success, the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn shell_start() -> String {
    let mut slot = shell_slot();
    if slot.is_some() {
        return String::new();
    }
    let started = app_config().and_then(ShellSession::start);
    match started {
        Ok(session) => {
            *slot = Some(session);
            String::new()
        }
        Err(err) => {
            warn!("event=shell_start module=ffi status=error error={err}");
            err
        }
    }
}

/// Stops the shell, unmounting every screen.
#[flutter_rust_bridge::frb(sync)]
pub fn shell_stop() -> bool {
    let stopped = shell_slot().take();
    stopped.is_some()
}

#[flutter_rust_bridge::frb(sync)]
pub fn shell_view() -> Option<ShellView> {
    with_shell(|session| session.view())
}

#[flutter_rust_bridge::frb(sync)]
pub fn shell_navigate(route: String) -> ShellAck {
    with_shell(|session| session.navigate(&route))
        .unwrap_or_else(|| ShellAck::failed(SHELL_NOT_RUNNING))
}

#[flutter_rust_bridge::frb(sync)]
pub fn shell_back() -> ShellAck {
    with_shell(|session| ShellAck::done(session.shell.back().is_some()))
        .unwrap_or_else(|| ShellAck::failed(SHELL_NOT_RUNNING))
}

#[flutter_rust_bridge::frb(sync)]
pub fn shell_press_header_action() -> ShellAck {
    with_shell(|session| ShellAck::done(session.shell.press_header_action()))
        .unwrap_or_else(|| ShellAck::failed(SHELL_NOT_RUNNING))
}

/// Mirrors text input into the visible emergency number field.
#[flutter_rust_bridge::frb(sync)]
pub fn shell_set_emergency_field(value: String) -> ShellAck {
    with_shell(|session| {
        session.shell.set_emergency_field(value);
        ShellAck::done(true)
    })
    .unwrap_or_else(|| ShellAck::failed(SHELL_NOT_RUNNING))
}

/// Saves the visible emergency number field. The outcome also arrives as a
/// notification.
#[flutter_rust_bridge::frb(sync)]
pub fn shell_save_emergency_number() -> ShellAck {
    with_shell(|session| {
        if session.shell.save_emergency_number() {
            ShellAck::done(true)
        } else {
            ShellAck::failed(MSG_SAVE_EMERGENCY_FAILED)
        }
    })
    .unwrap_or_else(|| ShellAck::failed(SHELL_NOT_RUNNING))
}

/// "Tap to Scan Again".
#[flutter_rust_bridge::frb(sync)]
pub fn shell_scan_reset() -> ShellAck {
    with_shell(|session| ShellAck::done(session.shell.reset_scan()))
        .unwrap_or_else(|| ShellAck::failed(SHELL_NOT_RUNNING))
}

/// Notifications queued since the last call, oldest first.
#[flutter_rust_bridge::frb(sync)]
pub fn shell_take_notifications() -> Vec<NotificationView> {
    with_shell(|session| session.take_notifications()).unwrap_or_default()
}

/// Open host requests: `permission:<capability>`, `contacts`, `position`.
#[flutter_rust_bridge::frb(sync)]
pub fn host_pending_requests() -> Vec<String> {
    with_shell(|session| session.pending_requests()).unwrap_or_default()
}

/// Answers a permission prompt for `capability` (`contacts|location|camera`).
#[flutter_rust_bridge::frb(sync)]
pub fn host_answer_permission(capability: String, granted: bool) -> bool {
    with_shell(|session| session.answer_permission(&capability, granted)).unwrap_or(false)
}

#[flutter_rust_bridge::frb(sync)]
pub fn host_provide_contacts(contacts: Vec<ContactInput>) -> bool {
    with_shell(|session| session.bridge.provide_contacts(Ok(to_records(contacts))))
        .unwrap_or(false)
}

#[flutter_rust_bridge::frb(sync)]
pub fn host_provide_position(latitude: f64, longitude: f64) -> bool {
    with_shell(|session| {
        session
            .bridge
            .provide_position(Ok(Coordinate::new(latitude, longitude)))
    })
    .unwrap_or(false)
}

/// Fails an open request, e.g. when the platform call threw.
#[flutter_rust_bridge::frb(sync)]
pub fn host_reject_request(request: String, message: String) -> bool {
    with_shell(|session| session.reject_request(&request, &message)).unwrap_or(false)
}

/// Forwards one decoded barcode to the scan screen.
#[flutter_rust_bridge::frb(sync)]
pub fn host_push_scan(kind: String, data: String) -> bool {
    with_shell(|session| session.bridge.push_scan(ScanEvent::new(kind, data))).unwrap_or(false)
}

/// One running shell: screens, host mailbox and the runtime their tasks use.
///
/// Field order matters: the shell unmounts before the runtime shuts down.
struct ShellSession {
    shell: AppShell,
    bridge: Arc<HostBridge>,
    feed: NotificationFeed,
    _runtime: Runtime,
}

impl ShellSession {
    fn start(config: &AppConfig) -> Result<Self, String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(SHELL_WORKER_THREADS)
            .thread_name("lifeline-shell")
            .enable_all()
            .build()
            .map_err(|err| format!("failed to start runtime: {err}"))?;
        let weather = OpenWeatherClient::new(config.weather.clone())
            .map_err(|err| format!("failed to build weather client: {err}"))?;
        let conn = open_db(&config.db_path)
            .map_err(|err| format!("preference DB open failed: {err}"))?;

        let bridge = HostBridge::new();
        let (notifier, feed) = notification::channel();
        let ctx = AppContext {
            runtime: runtime.handle().clone(),
            contacts: Arc::new(bridge.contacts()),
            location: Arc::new(bridge.location()),
            camera: Arc::new(bridge.camera()),
            weather: Arc::new(weather),
            clock: Arc::new(SystemClock),
            notifier,
        };
        let shell = AppShell::new(ctx, conn);
        info!("event=shell_start module=ffi status=ok");

        Ok(Self {
            shell,
            bridge,
            feed,
            _runtime: runtime,
        })
    }

    fn navigate(&mut self, route: &str) -> ShellAck {
        match self.shell.navigate_to(route) {
            Ok(changed) => ShellAck::done(changed),
            Err(err) => ShellAck::failed(err.to_string()),
        }
    }

    fn view(&self) -> ShellView {
        let navigator = self.shell.navigator();
        let mut view = ShellView {
            current: navigator.current().as_str().to_string(),
            stack: navigator
                .stack()
                .iter()
                .map(|screen| screen.as_str().to_string())
                .collect(),
            can_go_back: navigator.can_go_back(),
            header_action: navigator.header_action().map(ActionView::from),
            navigation_buttons: navigator
                .navigation_buttons()
                .iter()
                .map(ActionView::from)
                .collect(),
            emergency_field: self.shell.emergency_number().field().to_string(),
            contacts: None,
            environment: None,
            scan: None,
        };

        match self.shell.top() {
            Some(MountedScreen::Contacts(screen)) => {
                let state = screen.state();
                view.contacts = Some(ContactsView {
                    phase: state.phase.as_str().to_string(),
                    rows: state.rows.into_iter().map(ContactRowView::from).collect(),
                });
            }
            Some(MountedScreen::WeatherAndTime(screen)) => {
                let state = screen.state();
                view.environment = Some(EnvironmentView {
                    phase: state.phase.as_str().to_string(),
                    time: state.snapshot.display_time(),
                    temperature: state.snapshot.display_temperature(),
                    location: state.snapshot.display_location(),
                });
            }
            Some(MountedScreen::About(screen)) => {
                let session = screen.session();
                view.scan = Some(ScanView {
                    phase: session.phase().as_str().to_string(),
                    status: session.status_text().to_string(),
                    result: session.result().map(|result| result.data.clone()),
                    reset_action: session.reset_action().map(str::to_string),
                });
            }
            Some(MountedScreen::EmergencyNumber(_)) | None => {}
        }
        view
    }

    fn take_notifications(&mut self) -> Vec<NotificationView> {
        self.feed
            .drain()
            .into_iter()
            .map(NotificationView::from)
            .collect()
    }

    fn pending_requests(&self) -> Vec<String> {
        self.bridge
            .pending()
            .into_iter()
            .map(HostRequest::id)
            .collect()
    }

    fn answer_permission(&self, capability: &str, granted: bool) -> bool {
        let Ok(capability) = parse_device_capability(capability) else {
            return false;
        };
        let status = if granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        };
        self.bridge.answer_permission(capability, Ok(status))
    }

    fn reject_request(&self, request: &str, message: &str) -> bool {
        match HostRequest::parse(request) {
            Some(request) => self.bridge.reject(request, message),
            None => false,
        }
    }
}

fn shell_slot() -> MutexGuard<'static, Option<ShellSession>> {
    SHELL.lock().unwrap_or_else(PoisonError::into_inner)
}

fn with_shell<T>(f: impl FnOnce(&mut ShellSession) -> T) -> Option<T> {
    shell_slot().as_mut().map(f)
}

fn to_records(contacts: Vec<ContactInput>) -> Vec<ContactRecord> {
    contacts.into_iter().map(ContactRecord::from).collect()
}

fn app_config() -> Result<&'static AppConfig, String> {
    APP_CONFIG
        .get_or_init(AppConfig::from_env)
        .as_ref()
        .map_err(|err| err.to_string())
}

fn load_emergency_number_at(db_path: &Path) -> PreferenceResponse {
    let loaded = open_db(db_path)
        .map_err(|err| format!("preference DB open failed: {err}"))
        .and_then(|conn| {
            PreferenceService::new(SqlitePreferenceRepository::new(&conn))
                .emergency_number()
                .map_err(|err| err.to_string())
        });
    match loaded {
        Ok(value) => PreferenceResponse {
            ok: true,
            value,
            message: String::new(),
        },
        Err(err) => load_failed(&err),
    }
}

fn save_emergency_number_at(db_path: &Path, value: String) -> PreferenceResponse {
    let saved = open_db(db_path)
        .map_err(|err| format!("preference DB open failed: {err}"))
        .and_then(|conn| {
            PreferenceService::new(SqlitePreferenceRepository::new(&conn))
                .set_emergency_number(value.as_str())
                .map_err(|err| err.to_string())
        });
    match saved {
        Ok(()) => PreferenceResponse {
            ok: true,
            value: Some(value),
            message: MSG_EMERGENCY_SAVED.to_string(),
        },
        Err(err) => save_failed(&err),
    }
}

fn load_failed(err: &str) -> PreferenceResponse {
    warn!("event=ffi_emergency_number_load module=ffi status=error error={err}");
    PreferenceResponse {
        ok: false,
        value: None,
        message: MSG_LOAD_EMERGENCY_FAILED.to_string(),
    }
}

fn save_failed(err: &str) -> PreferenceResponse {
    warn!("event=ffi_emergency_number_save module=ffi status=error error={err}");
    PreferenceResponse {
        ok: false,
        value: None,
        message: MSG_SAVE_EMERGENCY_FAILED.to_string(),
    }
}
