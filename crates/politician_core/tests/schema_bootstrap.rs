use politician_core::db::schema::{user_version, SCHEMA_VERSION};
use politician_core::db::{close_db, open_db, open_db_in_memory, DbError};
use politician_core::RecordStore;
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(user_version(&conn).unwrap(), SCHEMA_VERSION);
    assert_object_exists(&conn, "table", "politician");
    assert_object_exists(&conn, "table", "ratings");
    assert_object_exists(&conn, "trigger", "update_total_rating");

    let foreign_keys: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(foreign_keys, 1);
}

#[test]
fn reopening_same_file_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.db");

    let conn_first = open_db(&path).unwrap();
    {
        let store = RecordStore::sqlite(&conn_first);
        store.register("Ana", "Left", Some("bio")).unwrap();
        store.rate("Ana", "Left", 4, None).unwrap();
    }
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(user_version(&conn_second).unwrap(), SCHEMA_VERSION);
    let store = RecordStore::sqlite(&conn_second);
    let found = store.find_by_name("ana").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].total_rating, 4);
    assert_eq!(store.ratings_for("ana", "left").unwrap().len(), 1);
}

#[test]
fn foreign_keys_are_enforced_on_reopened_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.db");
    drop(open_db(&path).unwrap());

    // A fresh connection defaults to foreign_keys=OFF until bootstrapped.
    let conn = open_db(&path).unwrap();
    let err = conn
        .execute(
            "INSERT INTO ratings (polit_name, polit_party, points) VALUES ('X', 'Y', 1);",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("FOREIGN KEY"));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn opening_file_in_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("data.db");

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::Sqlite(_)));
}

#[test]
fn close_db_reports_clean_close_and_data_survives() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.db");

    let conn = open_db(&path).unwrap();
    RecordStore::sqlite(&conn)
        .register("Ana", "Left", None)
        .unwrap();
    assert!(close_db(conn));

    let conn = open_db(&path).unwrap();
    assert_eq!(
        RecordStore::sqlite(&conn).find_by_party("left").unwrap().len(),
        1
    );
    assert!(close_db(conn));
}

fn assert_object_exists(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
