//! Tests for the Database engine
//!
//! These tests verify:
//! - The CREATE/INSERT/SELECT/DELETE/SHOW flows and their response texts
//! - Idempotent create
//! - Insertion order, WHERE, ORDER BY and LIMIT behavior
//! - Durability: file contents match live rows, state survives reopen
//! - Per-table linearizability under concurrent writers

use std::sync::Arc;
use std::thread;

use serde_json::{json, Value};
use tabuladb::query::parse;
use tabuladb::{Config, Database};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_db() -> (TempDir, Database) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder().data_dir(temp_dir.path()).build();
    let db = Database::open(config).unwrap();
    (temp_dir, db)
}

fn exec(db: &Database, request: &str) -> String {
    db.execute(parse(request))
}

fn exec_json(db: &Database, request: &str) -> Value {
    let response = exec(db, request);
    serde_json::from_str(&response)
        .unwrap_or_else(|e| panic!("expected JSON response, got {response:?}: {e}"))
}

// =============================================================================
// Create / Show
// =============================================================================

#[test]
fn test_create_then_show() {
    let (_temp, db) = setup_temp_db();

    assert_eq!(
        exec(&db, "CREATE TABLE users"),
        "Table 'users' created successfully!"
    );
    assert_eq!(exec_json(&db, "SHOW TABLES"), json!(["users"]));
}

#[test]
fn test_create_twice_reports_already_exists() {
    let (_temp, db) = setup_temp_db();

    exec(&db, "CREATE TABLE users");
    assert_eq!(
        exec(&db, "CREATE TABLE users"),
        "Table 'users' already exists!"
    );

    // no duplicate in the directory
    assert_eq!(exec_json(&db, "SHOW TABLES"), json!(["users"]));
}

#[test]
fn test_show_tables_is_sorted() {
    let (_temp, db) = setup_temp_db();

    exec(&db, "CREATE TABLE zebra");
    exec(&db, "CREATE TABLE apple");
    exec(&db, "CREATE TABLE mango");

    assert_eq!(
        exec_json(&db, "SHOW TABLES"),
        json!(["apple", "mango", "zebra"])
    );
}

#[test]
fn test_create_rejects_path_escaping_names() {
    let (_temp, db) = setup_temp_db();

    let response = exec(&db, "CREATE TABLE ..");
    assert!(response.contains("Invalid table name"), "got: {response}");
    assert_eq!(exec_json(&db, "SHOW TABLES"), json!([]));
}

// =============================================================================
// Insert / Select
// =============================================================================

#[test]
fn test_insert_select_round_trip() {
    let (_temp, db) = setup_temp_db();

    exec(&db, "CREATE TABLE users");
    assert_eq!(
        exec(&db, r#"INSERT INTO users {"id": 1, "name": "John"}"#),
        "Row inserted successfully!"
    );

    assert_eq!(
        exec_json(&db, "SELECT * FROM users"),
        json!([{"id": 1, "name": "John"}])
    );
}

#[test]
fn test_insert_into_missing_table_fails() {
    let (_temp, db) = setup_temp_db();

    assert_eq!(
        exec(&db, r#"INSERT INTO ghost {"id": 1}"#),
        "Table 'ghost' does not exist"
    );
}

#[test]
fn test_insertion_order_is_preserved() {
    let (_temp, db) = setup_temp_db();

    exec(&db, "CREATE TABLE seq");
    for n in 1..=5 {
        exec(&db, &format!(r#"INSERT INTO seq {{"n": {n}}}"#));
    }

    assert_eq!(
        exec_json(&db, "SELECT * FROM seq"),
        json!([{"n": 1}, {"n": 2}, {"n": 3}, {"n": 4}, {"n": 5}])
    );
}

#[test]
fn test_select_missing_table_returns_empty() {
    let (_temp, db) = setup_temp_db();

    assert_eq!(exec_json(&db, "SELECT * FROM nothing"), json!([]));
}

#[test]
fn test_rows_may_have_disjoint_fields() {
    let (_temp, db) = setup_temp_db();

    exec(&db, "CREATE TABLE mixed");
    exec(&db, r#"INSERT INTO mixed {"a": 1}"#);
    exec(&db, r#"INSERT INTO mixed {"b": "two"}"#);

    assert_eq!(
        exec_json(&db, "SELECT * FROM mixed"),
        json!([{"a": 1}, {"b": "two"}])
    );
}

// =============================================================================
// WHERE / ORDER BY / LIMIT
// =============================================================================

#[test]
fn test_where_filters_rows() {
    let (_temp, db) = setup_temp_db();

    exec(&db, "CREATE TABLE users");
    exec(&db, r#"INSERT INTO users {"id": 1, "name": "Bea"}"#);
    exec(&db, r#"INSERT INTO users {"id": 2, "name": "Cid"}"#);

    assert_eq!(
        exec_json(&db, "SELECT * FROM users WHERE id = 1 ORDER BY name ASC"),
        json!([{"id": 1, "name": "Bea"}])
    );
}

#[test]
fn test_where_conditions_are_conjoined() {
    let (_temp, db) = setup_temp_db();

    exec(&db, "CREATE TABLE people");
    exec(&db, r#"INSERT INTO people {"age": 30, "city": "Oslo"}"#);
    exec(&db, r#"INSERT INTO people {"age": 30, "city": "Turin"}"#);
    exec(&db, r#"INSERT INTO people {"age": 40, "city": "Oslo"}"#);

    assert_eq!(
        exec_json(&db, "SELECT * FROM people WHERE age = 30 AND city = Oslo"),
        json!([{"age": 30, "city": "Oslo"}])
    );
}

#[test]
fn test_order_by_desc() {
    let (_temp, db) = setup_temp_db();

    exec(&db, "CREATE TABLE scores");
    exec(&db, r#"INSERT INTO scores {"s": 10}"#);
    exec(&db, r#"INSERT INTO scores {"s": 30}"#);
    exec(&db, r#"INSERT INTO scores {"s": 20}"#);

    assert_eq!(
        exec_json(&db, "SELECT * FROM scores ORDER BY s DESC"),
        json!([{"s": 30}, {"s": 20}, {"s": 10}])
    );
}

#[test]
fn test_order_by_is_stable() {
    let (_temp, db) = setup_temp_db();

    exec(&db, "CREATE TABLE t");
    exec(&db, r#"INSERT INTO t {"a": 1, "tag": "first"}"#);
    exec(&db, r#"INSERT INTO t {"a": 1, "tag": "second"}"#);
    exec(&db, r#"INSERT INTO t {"a": 0, "tag": "third"}"#);

    assert_eq!(
        exec_json(&db, "SELECT * FROM t ORDER BY a ASC"),
        json!([
            {"a": 0, "tag": "third"},
            {"a": 1, "tag": "first"},
            {"a": 1, "tag": "second"}
        ])
    );
}

#[test]
fn test_limit_truncates_results() {
    let (_temp, db) = setup_temp_db();

    exec(&db, "CREATE TABLE seq");
    for n in 1..=5 {
        exec(&db, &format!(r#"INSERT INTO seq {{"n": {n}}}"#));
    }

    assert_eq!(
        exec_json(&db, "SELECT * FROM seq ORDER BY n DESC LIMIT 2"),
        json!([{"n": 5}, {"n": 4}])
    );
    assert_eq!(exec_json(&db, "SELECT * FROM seq LIMIT 0"), json!([]));
    // a limit larger than the table is not an error
    assert_eq!(
        exec_json(&db, "SELECT * FROM seq LIMIT 100"),
        exec_json(&db, "SELECT * FROM seq")
    );
}

// =============================================================================
// Delete
// =============================================================================

#[test]
fn test_delete_table() {
    let (temp, db) = setup_temp_db();

    exec(&db, "CREATE TABLE gone");
    exec(&db, r#"INSERT INTO gone {"n": 1}"#);

    assert_eq!(
        exec(&db, "DELETE TABLE gone"),
        "Table 'gone' deleted successfully!"
    );
    assert_eq!(exec_json(&db, "SHOW TABLES"), json!([]));
    // deleted table reads as empty, not as an error
    assert_eq!(exec_json(&db, "SELECT * FROM gone"), json!([]));
    // and its file is gone
    assert!(!temp.path().join("gone.json").exists());
}

#[test]
fn test_delete_missing_table_reports_not_found() {
    let (_temp, db) = setup_temp_db();

    assert_eq!(
        exec(&db, "DELETE TABLE ghost"),
        "Table 'ghost' does not exist"
    );
}

// =============================================================================
// Invalid requests
// =============================================================================

#[test]
fn test_invalid_requests_get_fixed_response() {
    let (_temp, db) = setup_temp_db();

    assert_eq!(exec(&db, "DROP TABLE users"), "Invalid request!");
    assert_eq!(exec(&db, "SELECT name FROM users"), "Invalid request!");
    assert_eq!(exec(&db, r#"INSERT INTO users {"bad"#), "Invalid request!");
}

// =============================================================================
// Durability
// =============================================================================

#[test]
fn test_state_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();

    {
        let db = Database::open_path(temp_dir.path()).unwrap();
        exec(&db, "CREATE TABLE users");
        exec(&db, r#"INSERT INTO users {"id": 1, "name": "John"}"#);
        exec(&db, "CREATE TABLE empty");
    }

    let db = Database::open_path(temp_dir.path()).unwrap();
    assert_eq!(exec_json(&db, "SHOW TABLES"), json!(["empty", "users"]));
    assert_eq!(
        exec_json(&db, "SELECT * FROM users"),
        json!([{"id": 1, "name": "John"}])
    );
}

#[test]
fn test_durable_file_always_matches_live_rows() {
    let (temp, db) = setup_temp_db();

    exec(&db, "CREATE TABLE t");
    for n in 1..=3 {
        exec(&db, &format!(r#"INSERT INTO t {{"n": {n}}}"#));

        let bytes = std::fs::read(temp.path().join("t.json")).unwrap();
        let on_disk: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(on_disk, exec_json(&db, "SELECT * FROM t"));
    }
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_inserts_lose_no_updates() {
    let temp_dir = TempDir::new().unwrap();
    let db = Arc::new(Database::open_path(temp_dir.path()).unwrap());

    exec(&db, "CREATE TABLE busy");

    const WRITERS: usize = 8;
    const ROWS_PER_WRITER: usize = 25;

    let handles: Vec<_> = (0..WRITERS)
        .map(|w| {
            let db = Arc::clone(&db);
            thread::spawn(move || {
                for i in 0..ROWS_PER_WRITER {
                    let response =
                        exec(&db, &format!(r#"INSERT INTO busy {{"w": {w}, "i": {i}}}"#));
                    assert_eq!(response, "Row inserted successfully!");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let rows = match exec_json(&db, "SELECT * FROM busy") {
        Value::Array(rows) => rows,
        other => panic!("expected array, got {other:?}"),
    };
    assert_eq!(rows.len(), WRITERS * ROWS_PER_WRITER);

    // every (writer, index) pair is durably present exactly once
    drop(db);
    let reopened = Database::open_path(temp_dir.path()).unwrap();
    let rows = match exec_json(&reopened, "SELECT * FROM busy") {
        Value::Array(rows) => rows,
        other => panic!("expected array, got {other:?}"),
    };
    assert_eq!(rows.len(), WRITERS * ROWS_PER_WRITER);

    let mut seen: Vec<(u64, u64)> = rows
        .iter()
        .map(|r| {
            (
                r.get("w").and_then(Value::as_u64).unwrap(),
                r.get("i").and_then(Value::as_u64).unwrap(),
            )
        })
        .collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), WRITERS * ROWS_PER_WRITER);
}

#[test]
fn test_operations_on_different_tables_do_not_interfere() {
    let temp_dir = TempDir::new().unwrap();
    let db = Arc::new(Database::open_path(temp_dir.path()).unwrap());

    exec(&db, "CREATE TABLE left");
    exec(&db, "CREATE TABLE right");

    let writer = {
        let db = Arc::clone(&db);
        thread::spawn(move || {
            for i in 0..50 {
                exec(&db, &format!(r#"INSERT INTO left {{"i": {i}}}"#));
            }
        })
    };
    let reader = {
        let db = Arc::clone(&db);
        thread::spawn(move || {
            for i in 0..50 {
                exec(&db, &format!(r#"INSERT INTO right {{"i": {i}}}"#));
                exec(&db, "SELECT * FROM right");
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();

    let count = |table: &str| match exec_json(&db, &format!("SELECT * FROM {table}")) {
        Value::Array(rows) => rows.len(),
        other => panic!("expected array, got {other:?}"),
    };
    assert_eq!(count("left"), 50);
    assert_eq!(count("right"), 50);
}
