use rusqlite::Connection;
use tasklist_core::storage::migrations::{latest_version, schema_version};
use tasklist_core::storage::{open_db, open_db_in_memory};
use tasklist_core::{
    DisabledSeedLoader, KeyValueStore, SqliteKeyValueStore, StaticSeedLoader, StorageError, Task,
    TaskStore, UuidIdGenerator, TASKS_KEY,
};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries');",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        StorageError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn values_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.db");

    {
        let conn = open_db(&path).unwrap();
        SqliteKeyValueStore::new(&conn).set("k", "v").unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(
        SqliteKeyValueStore::new(&conn).get("k").unwrap().as_deref(),
        Some("v")
    );
}

#[test]
fn task_store_round_trips_through_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.db");
    let seed = vec![Task::new("1", "A"), Task::new("2", "B").with_completed(true)];

    let expected = {
        let conn = open_db(&path).unwrap();
        let mut store = TaskStore::initialize(
            SqliteKeyValueStore::new(&conn),
            UuidIdGenerator,
            StaticSeedLoader::new(seed),
        )
        .unwrap();
        let added = store.add("local").unwrap();
        store.move_down(&added.id).unwrap();
        store.toggle_completed("1").unwrap();
        store.list()
    };

    let conn = open_db(&path).unwrap();
    let reloaded =
        TaskStore::initialize(SqliteKeyValueStore::new(&conn), UuidIdGenerator, DisabledSeedLoader)
            .unwrap();

    assert_eq!(reloaded.list(), expected);
    assert_eq!(expected[0].id, "1");
    assert!(expected[0].completed);
    assert_eq!(expected[1].title, "local");
    let raw = SqliteKeyValueStore::new(&conn).get(TASKS_KEY).unwrap().unwrap();
    assert!(raw.starts_with('['));
}
