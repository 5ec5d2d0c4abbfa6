use rusqlite::Connection;
use tasktrack_core::db::migrations::latest_version;
use tasktrack_core::db::{open_db, open_db_in_memory, DbError};
use tasktrack_core::store::{read_collection, write_collection, PROJECTS_KEY};
use tasktrack_core::{Project, SqliteRecordStore, User};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "records");
}

#[test]
fn reopening_file_database_keeps_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasktrack.db");

    let conn_first = open_db(&path).unwrap();
    let store = SqliteRecordStore::try_new(&conn_first).unwrap();
    let users = vec![User::new("kim@example.com", "Kim")];
    write_collection(&store, "users", &users).unwrap();
    drop(store);
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let store = SqliteRecordStore::try_new(&conn_second).unwrap();
    let loaded: Vec<User> = read_collection(&store, "users");
    assert_eq!(loaded, users);
    let projects: Vec<Project> = read_collection(&store, PROJECTS_KEY);
    assert!(projects.is_empty());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert_eq!(err.code(), "db_schema_too_new");
    match err {
        DbError::SchemaTooNew { found, latest } => {
            assert_eq!(found, 999);
            assert_eq!(latest, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
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
