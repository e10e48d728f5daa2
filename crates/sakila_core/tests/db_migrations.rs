use rusqlite::Connection;
use sakila_core::db::migrations::latest_version;
use sakila_core::db::{
    load_sample_dataset, open_db, open_db_in_memory, open_db_read_only, DbError,
};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in ["country", "city", "address", "customer"] {
        assert_object_exists(&conn, "table", table);
    }
    assert_object_exists(&conn, "view", "customer_detail");
}

#[test]
fn opened_connections_enforce_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);

    let err = conn
        .execute(
            "INSERT INTO customer (customer_id, first_name, last_name, email, active, address_id)
             VALUES (1, 'A', 'B', 'A.B@sakilacustomer.org', 1, 77);",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("FOREIGN KEY"));
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sakila.db");

    let mut conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    load_sample_dataset(&mut conn_first).unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let customers: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM customer_detail;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(customers, 599);
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
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn sample_dataset_refuses_a_populated_store() {
    let mut conn = open_db_in_memory().unwrap();
    load_sample_dataset(&mut conn).unwrap();

    let err = load_sample_dataset(&mut conn).unwrap_err();
    assert!(matches!(err, DbError::DatasetNotEmpty { customers: 599 }));

    let addresses: i64 = conn
        .query_row("SELECT COUNT(*) FROM address;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(addresses, 599);
}

#[test]
fn read_only_open_requires_current_schema_and_never_migrates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("CREATE TABLE note (id INTEGER PRIMARY KEY);")
        .unwrap();
    drop(conn);

    let err = open_db_read_only(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::SchemaNotReady {
            db_version: 0,
            ..
        }
    ));
    assert_eq!(schema_version(&Connection::open(&path).unwrap()), 0);

    drop(open_db(&path).unwrap());
    let conn = open_db_read_only(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert!(conn.execute("DELETE FROM country;", []).is_err());
}

#[test]
fn read_only_open_rejects_newer_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    assert!(matches!(
        open_db_read_only(&path).unwrap_err(),
        DbError::UnsupportedSchemaVersion { db_version: 999, .. }
    ));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
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
