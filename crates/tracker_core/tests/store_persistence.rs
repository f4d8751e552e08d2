use chrono::NaiveDate;
use rusqlite::Connection;
use tracker_core::db::migrations::latest_version;
use tracker_core::db::{open_db, open_db_in_memory, DbError};
use tracker_core::{
    KeyValueStore, NewProject, NotificationSetting, ProfileService, ProfileServiceError,
    ProfileStore, ProjectService, ProjectStore, SqliteKeyValueStore, UserProfile, PROFILE_KEY,
    PROJECTS_KEY,
};

fn sample_project() -> NewProject {
    NewProject {
        title: "Website Redesign".to_string(),
        description: String::new(),
        deadline: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
    }
}

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_store");
}

#[test]
fn projects_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("tracker.sqlite3");

    let created = {
        let conn = open_db(&path).unwrap();
        let service = ProjectService::new(ProjectStore::new(SqliteKeyValueStore::new(&conn)));
        service.create_project(sample_project()).unwrap()
    };

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let store = ProjectStore::new(SqliteKeyValueStore::new(&conn));
    assert_eq!(store.load().unwrap(), vec![created]);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::UnsupportedSchemaVersion { db_version: 999, latest_supported }
            if latest_supported == latest_version()
    ));
}

#[test]
fn unusable_parent_directory_is_reported_as_create_dir() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let err = open_db(blocker.join("tracker.sqlite3")).unwrap_err();
    assert!(matches!(err, DbError::CreateDir { ref path, .. } if *path == blocker));
}

#[test]
fn collection_is_stored_as_one_camel_case_json_array() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);
    let service = ProjectService::new(ProjectStore::new(kv));
    service.create_project(sample_project()).unwrap();
    service.create_project(sample_project()).unwrap();

    let raw = kv.get(PROJECTS_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["deadline"], "2026-12-01");
    assert_eq!(items[0]["progress"], 0);
    assert!(items[0]["createdAt"].is_string());
    assert!(items[0]["tasks"].as_array().unwrap().is_empty());
}

#[test]
fn missing_or_malformed_projects_load_as_empty() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);
    let store = ProjectStore::new(kv);
    assert!(store.load().unwrap().is_empty());

    kv.set(PROJECTS_KEY, "{not json").unwrap();
    assert!(store.load().unwrap().is_empty());

    kv.set(PROJECTS_KEY, r#"{"projects": []}"#).unwrap();
    assert!(store.load().unwrap().is_empty());

    kv.set(
        PROJECTS_KEY,
        r#"[{"id":"11111111-2222-4333-8444-555555555555","title":"x","deadline":"2026-01-01",
            "progress":250,"tasks":[],"createdAt":"2026-01-01T00:00:00Z"}]"#,
    )
    .unwrap();
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn mutation_after_malformed_state_starts_from_empty() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);
    kv.set(PROJECTS_KEY, "garbage").unwrap();

    let service = ProjectService::new(ProjectStore::new(kv));
    service.create_project(sample_project()).unwrap();
    assert_eq!(service.list_projects().unwrap().len(), 1);
}

#[test]
fn profile_defaults_and_updates() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);
    let service = ProfileService::new(ProfileStore::new(kv));

    assert_eq!(service.get_profile().unwrap(), UserProfile::default());

    let updated = service
        .update_identity(Some(" Ada ".to_string()), Some("ada@example.com".to_string()))
        .unwrap();
    assert_eq!(updated.name, "Ada");

    assert!(service
        .toggle_setting(NotificationSetting::WeeklyDigest)
        .unwrap());
    let reloaded = service.get_profile().unwrap();
    assert_eq!(reloaded.email, "ada@example.com");
    assert!(reloaded.notification_settings.weekly_digest);

    let err = service
        .update_identity(None, Some("nope".to_string()))
        .unwrap_err();
    assert!(matches!(err, ProfileServiceError::Validation(_)));
    assert_eq!(service.get_profile().unwrap().email, "ada@example.com");

    kv.set(PROFILE_KEY, "{broken").unwrap();
    assert_eq!(service.get_profile().unwrap(), UserProfile::default());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
