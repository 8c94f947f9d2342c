mod common;

use common::{FakeCamera, FakeContacts, FakeLocation, FakeWeather};
use lifeline_core::db::open_db;
use lifeline_core::model::notification::{self, NotificationFeed, MSG_EMERGENCY_SAVED};
use lifeline_core::screen::environment::SystemClock;
use lifeline_core::screen::contacts::ContactsPhase;
use lifeline_core::screen::scan::ScanPhase;
use lifeline_core::{
    AppContext, AppShell, ContactRecord, DeviceCapability, HostBridge, HostRequest,
    MountedScreen, NavigationError, PermissionStatus, PhoneNumber, ScanEvent, ScreenName,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

fn shell_at(path: &Path) -> (AppShell, NotificationFeed) {
    let (notifier, feed) = notification::channel();
    let (camera, _events) = FakeCamera::granted();
    let ctx = AppContext {
        runtime: Handle::current(),
        contacts: Arc::new(FakeContacts::granted(vec![ContactRecord::new(
            "1",
            Some("Mary"),
            Some("Jackson"),
            vec![PhoneNumber::new("555-0199")],
        )])),
        location: Arc::new(FakeLocation::at(10.0, 20.0)),
        camera: Arc::new(camera),
        weather: Arc::new(FakeWeather::reporting(25.0)),
        clock: Arc::new(SystemClock),
        notifier,
    };
    (AppShell::new(ctx, open_db(path).unwrap()), feed)
}

#[tokio::test(start_paused = true)]
async fn starts_on_root_with_about_header_action() {
    let dir = tempfile::tempdir().unwrap();
    let (mut shell, _feed) = shell_at(&dir.path().join("shell.db"));

    assert_eq!(shell.current(), ScreenName::EmergencyNumber);
    assert!(shell.top().is_none());
    assert_eq!(shell.back(), None);

    assert!(shell.press_header_action());
    assert_eq!(shell.current(), ScreenName::About);
    assert!(matches!(shell.top(), Some(MountedScreen::About(_))));
    assert!(shell.header_action().is_none());
    assert!(!shell.press_header_action());
}

#[tokio::test(start_paused = true)]
async fn navigation_mounts_and_unmounts_screens() {
    let dir = tempfile::tempdir().unwrap();
    let (mut shell, _feed) = shell_at(&dir.path().join("shell.db"));

    assert_eq!(shell.navigate_to("Weather and Time"), Ok(true));
    let clock = match shell.top() {
        Some(MountedScreen::WeatherAndTime(screen)) => screen.subscribe(),
        other => panic!("unexpected top screen: {other:?}"),
    };
    assert_eq!(shell.navigate_to("Weather and Time"), Ok(false));

    assert!(shell.navigate(ScreenName::Contacts));
    assert_eq!(
        shell.navigator().stack(),
        &[
            ScreenName::EmergencyNumber,
            ScreenName::WeatherAndTime,
            ScreenName::Contacts
        ]
    );

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(clock.borrow().ticks >= 1, "covered screens stay mounted");

    assert_eq!(shell.back(), Some(ScreenName::Contacts));
    assert_eq!(shell.back(), Some(ScreenName::WeatherAndTime));
    let frozen = clock.borrow().ticks;
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(clock.borrow().ticks, frozen, "popped screen must stop ticking");
    assert_eq!(shell.current(), ScreenName::EmergencyNumber);
}

#[tokio::test(start_paused = true)]
async fn unknown_route_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (mut shell, _feed) = shell_at(&dir.path().join("shell.db"));

    assert_eq!(
        shell.navigate_to("Settings"),
        Err(NavigationError::UnknownScreen("Settings".to_string()))
    );
    assert_eq!(shell.navigator().depth(), 1);
}

#[tokio::test(start_paused = true)]
async fn root_save_is_visible_to_the_next_shell() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shell.db");

    {
        let (mut shell, mut feed) = shell_at(&path);
        shell.set_emergency_field("112");
        assert!(shell.save_emergency_number());
        let notifications = feed.drain();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].message, MSG_EMERGENCY_SAVED);
    }

    let (shell, _feed) = shell_at(&path);
    assert_eq!(shell.emergency_number().field(), "112");
}

#[tokio::test(start_paused = true)]
async fn edits_go_to_the_pushed_emergency_number_screen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shell.db");
    let (mut shell, mut feed) = shell_at(&path);

    shell.set_emergency_field("111");
    assert!(shell.save_emergency_number());

    assert!(shell.navigate(ScreenName::Contacts));
    assert!(shell.navigate(ScreenName::EmergencyNumber));
    assert!(matches!(
        shell.top(),
        Some(MountedScreen::EmergencyNumber(_))
    ));
    assert_eq!(shell.emergency_number().field(), "111");

    shell.set_emergency_field("222");
    assert_eq!(shell.emergency_number().field(), "222");
    assert!(shell.save_emergency_number());
    assert_eq!(feed.drain().len(), 2);

    assert_eq!(shell.back(), Some(ScreenName::EmergencyNumber));
    assert_eq!(shell.back(), Some(ScreenName::Contacts));
    assert_eq!(shell.emergency_number().field(), "111", "root keeps its own field");
    drop(shell);

    let (reopened, _feed) = shell_at(&path);
    assert_eq!(reopened.emergency_number().field(), "222");
}

fn host_shell_at(path: &Path, bridge: &Arc<HostBridge>) -> (AppShell, NotificationFeed) {
    let (notifier, feed) = notification::channel();
    let ctx = AppContext {
        runtime: Handle::current(),
        contacts: Arc::new(bridge.contacts()),
        location: Arc::new(bridge.location()),
        camera: Arc::new(bridge.camera()),
        weather: Arc::new(FakeWeather::reporting(18.0)),
        clock: Arc::new(SystemClock),
        notifier,
    };
    (AppShell::new(ctx, open_db(path).unwrap()), feed)
}

async fn requested(bridge: &HostBridge, request: HostRequest) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !bridge.pending().contains(&request) {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("request should be raised");
}

#[tokio::test]
async fn host_answers_drive_the_contacts_screen() {
    let dir = tempfile::tempdir().unwrap();
    let bridge = HostBridge::new();
    let (mut shell, mut feed) = host_shell_at(&dir.path().join("shell.db"), &bridge);

    assert!(shell.navigate(ScreenName::Contacts));
    let mut state = match shell.top() {
        Some(MountedScreen::Contacts(screen)) => screen.subscribe(),
        other => panic!("unexpected top screen: {other:?}"),
    };

    requested(&bridge, HostRequest::Permission(DeviceCapability::Contacts)).await;
    assert!(bridge.answer_permission(DeviceCapability::Contacts, Ok(PermissionStatus::Granted)));
    requested(&bridge, HostRequest::Contacts).await;
    assert!(bridge.provide_contacts(Ok(vec![ContactRecord::new(
        "7",
        Some("Grace"),
        Some("Hopper"),
        vec![PhoneNumber::new("555-0107")],
    )])));

    let rows = state
        .wait_for(|state| state.phase == ContactsPhase::Ready)
        .await
        .unwrap()
        .rows
        .clone();
    assert_eq!(rows[0].title, "Grace Hopper");
    assert!(feed.try_next().is_none());
}

#[tokio::test]
async fn unmounted_screen_requests_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let bridge = HostBridge::new();
    let (mut shell, _feed) = host_shell_at(&dir.path().join("shell.db"), &bridge);

    assert!(shell.navigate(ScreenName::WeatherAndTime));
    requested(&bridge, HostRequest::Permission(DeviceCapability::Location)).await;

    shell.back();
    tokio::time::timeout(Duration::from_secs(5), async {
        while !bridge.pending().is_empty() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("abandoned request should be dropped");
    assert!(!bridge.answer_permission(DeviceCapability::Location, Ok(PermissionStatus::Granted)));
}

#[tokio::test]
async fn host_scans_reach_the_scan_screen_until_reset() {
    let dir = tempfile::tempdir().unwrap();
    let bridge = HostBridge::new();
    let (mut shell, mut feed) = host_shell_at(&dir.path().join("shell.db"), &bridge);

    assert!(shell.press_header_action());
    let mut session = match shell.top() {
        Some(MountedScreen::About(screen)) => screen.subscribe(),
        other => panic!("unexpected top screen: {other:?}"),
    };
    assert!(!shell.reset_scan());

    requested(&bridge, HostRequest::Permission(DeviceCapability::Camera)).await;
    bridge.answer_permission(DeviceCapability::Camera, Ok(PermissionStatus::Granted));
    session.wait_for(|s| s.is_armed()).await.unwrap();

    assert!(bridge.push_scan(ScanEvent::new("qr", "lifeline://share")));
    session
        .wait_for(|s| matches!(s.phase(), ScanPhase::Scanned(_)))
        .await
        .unwrap();
    let scanned = feed.next().await.unwrap();
    assert_eq!(scanned.message, "lifeline://share");

    assert!(shell.reset_scan());
    assert!(session.borrow().is_armed());
}
