use lifeline_core::db::{open_db, open_db_in_memory};
use lifeline_core::model::notification::{
    self, NotificationLevel, MSG_EMERGENCY_SAVED, MSG_LOAD_EMERGENCY_FAILED,
    MSG_SAVE_EMERGENCY_FAILED,
};
use lifeline_core::screen::emergency_number::EmergencyNumberScreen;
use lifeline_core::{
    PreferenceRepository, PreferenceService, RepoError, SqlitePreferenceRepository,
    EMERGENCY_NUMBER_KEY,
};

#[test]
fn repository_upserts_and_reads_back() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePreferenceRepository::new(&conn);

    assert_eq!(repo.get("theme").unwrap(), None);
    repo.set("theme", "dark").unwrap();
    repo.set("theme", "light").unwrap();
    assert_eq!(repo.get("theme").unwrap().as_deref(), Some("light"));
}

#[test]
fn repository_rejects_blank_keys() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePreferenceRepository::new(&conn);

    assert!(matches!(repo.set("  ", "x"), Err(RepoError::InvalidKey(_))));
    assert!(matches!(repo.get(""), Err(RepoError::InvalidKey(_))));
}

#[test]
fn service_uses_fixed_key() {
    let conn = open_db_in_memory().unwrap();
    let service = PreferenceService::new(SqlitePreferenceRepository::new(&conn));
    service.set_emergency_number("112").unwrap();

    let raw: String = conn
        .query_row(
            "SELECT value FROM preferences WHERE key = ?1;",
            [EMERGENCY_NUMBER_KEY],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(raw, "112");
}

#[test]
fn fresh_mount_starts_empty_without_notifications() {
    let conn = open_db_in_memory().unwrap();
    let (notifier, mut feed) = notification::channel();

    let screen = EmergencyNumberScreen::mount(SqlitePreferenceRepository::new(&conn), notifier);
    assert_eq!(screen.field(), "");
    assert!(feed.try_next().is_none());
}

#[test]
fn saved_values_survive_a_fresh_mount_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.db");

    for value in ["911", "+44 (0)20 7946 0958", "not a number", "", "  padded  "] {
        let (notifier, mut feed) = notification::channel();
        {
            let conn = open_db(&path).unwrap();
            let mut screen =
                EmergencyNumberScreen::mount(SqlitePreferenceRepository::new(&conn), notifier.clone());
            screen.set_field(value);
            assert!(screen.save(SqlitePreferenceRepository::new(&conn)));
        }

        let conn = open_db(&path).unwrap();
        let reloaded = EmergencyNumberScreen::mount(SqlitePreferenceRepository::new(&conn), notifier);
        assert_eq!(reloaded.field(), value);

        let notifications = feed.drain();
        assert_eq!(notifications.len(), 1, "{value:?}");
        assert_eq!(notifications[0].level, NotificationLevel::Info);
        assert_eq!(notifications[0].message, MSG_EMERGENCY_SAVED);
    }
}

#[test]
fn failed_load_leaves_field_empty_and_notifies_once() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TABLE preferences;").unwrap();
    let (notifier, mut feed) = notification::channel();

    let screen = EmergencyNumberScreen::mount(SqlitePreferenceRepository::new(&conn), notifier);

    assert_eq!(screen.field(), "");
    let notifications = feed.drain();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, NotificationLevel::Error);
    assert_eq!(notifications[0].message, MSG_LOAD_EMERGENCY_FAILED);
}

#[test]
fn failed_save_notifies_without_retry() {
    let conn = open_db_in_memory().unwrap();
    let (notifier, mut feed) = notification::channel();
    let mut screen = EmergencyNumberScreen::mount(SqlitePreferenceRepository::new(&conn), notifier);
    screen.set_field("999");

    conn.execute_batch("DROP TABLE preferences;").unwrap();
    assert!(!screen.save(SqlitePreferenceRepository::new(&conn)));

    let notifications = feed.drain();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].message, MSG_SAVE_EMERGENCY_FAILED);
    assert_eq!(screen.field(), "999");
}
