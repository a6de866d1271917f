use diesel::connection::SimpleConnection;

use pushkind_stations::migration::{run_embedded, run_script};

mod common;

#[test]
fn test_creates_and_removes_db_files() {
    let base = "test_creates_and_removes_db_files.db";

    {
        let test_db = common::TestDb::new(base);
        let conn = test_db.pool().get();
        assert!(conn.is_ok());
    }

    let db_path = std::path::Path::new(base);
    assert!(!db_path.exists());
    assert!(!std::path::Path::new(&format!("{base}-shm")).exists());
    assert!(!std::path::Path::new(&format!("{base}-wal")).exists());
}

#[test]
fn test_schema_setup_is_repeatable() {
    let test_db = common::TestDb::new("test_schema_setup_is_repeatable.db");
    let mut conn = test_db.pool().get().unwrap();

    assert!(run_embedded(&mut *conn).unwrap().is_empty());

    conn.batch_execute("SELECT id, hub_id, name FROM stations LIMIT 1")
        .expect("stations table exists");

    let report = run_script(
        &mut *conn,
        "CREATE TABLE stations (id INTEGER PRIMARY KEY);
         INSERT INTO stations (hub_id, name, is_active, created_at, updated_at)
             VALUES (1, 'Seeded', 1, '2024-01-01 00:00:00', '2024-01-01 00:00:00');
         INSERT INTO no_such_table VALUES (1);",
    );

    assert_eq!(report.skipped, 1);
    assert_eq!(report.applied, 1);
    assert_eq!(report.failed.len(), 1);
    assert!(
        report
            .manual_instructions()
            .unwrap()
            .contains("INSERT INTO no_such_table VALUES (1);")
    );
}
