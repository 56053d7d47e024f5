//! End-to-end imports: CSV files on disk into a SQLite database file,
//! checked by querying the database directly.

use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use csv_db_populator::parser::normalize;
use csv_db_populator::{Error, FixedColumnType, Populator, ScriptedChooser, Settings};

// =============================================================================
// Fixtures
// =============================================================================

const SCHOOLS: &str = "UnitID,Institution_Name,Revenue\n\
                       1,A University,100000\n\
                       2,B University,\n\
                       3,C University,30\n";

/// Scratch directory holding the database and the CSV files of one test
struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create fixture dir");
        }
        fs::write(&path, contents).expect("Failed to write fixture");
        path
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn settings(&self) -> Settings {
        Settings {
            database: self.path("db/school_data.sqlite"),
            ..Settings::default()
        }
    }

    fn populator(&self) -> Populator {
        Populator::open(self.settings()).expect("Failed to open database")
    }

    fn connection(&self) -> Connection {
        Connection::open(self.settings().database).expect("Failed to open test database")
    }
}

/// (name, declared type, not null, pk) per column
fn table_info(conn: &Connection, table: &str) -> Vec<(String, String, bool, bool)> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info(\"{}\")", table))
        .unwrap();
    let columns = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)? != 0,
                row.get::<_, i64>(5)? != 0,
            ))
        })
        .unwrap()
        .collect::<rusqlite::Result<Vec<_>>>()
        .unwrap();
    columns
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM \"{}\"", table), [], |r| r.get(0))
        .unwrap()
}

fn import_schools(ws: &TestWorkspace, populator: &mut Populator) -> PathBuf {
    let csv = ws.write("schools.csv", SCHOOLS);
    let count = populator
        .import_primary(&csv, &mut FixedColumnType::new("3"))
        .expect("Failed to import primary table");
    assert_eq!(count, 3);
    csv
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_primary_import() {
    let ws = TestWorkspace::new();
    let mut populator = ws.populator();
    import_schools(&ws, &mut populator);

    let conn = ws.connection();
    let columns = table_info(&conn, "school");
    assert_eq!(
        columns,
        vec![
            ("UnitID".to_string(), "INTEGER".to_string(), true, true),
            ("Institution_Name".to_string(), "VARCHAR(256)".to_string(), false, false),
            ("Revenue".to_string(), "VARCHAR(256)".to_string(), false, false),
        ]
    );
    assert_eq!(count(&conn, "school"), 3);

    let revenue: Option<String> = conn
        .query_row("SELECT Revenue FROM school WHERE UnitID = 2", [], |r| r.get(0))
        .unwrap();
    assert_eq!(revenue, None);
}

#[test]
fn test_secondary_import_references_primary() {
    let ws = TestWorkspace::new();
    let mut populator = ws.populator();
    let csv = import_schools(&ws, &mut populator);

    let count_inserted = populator
        .import_secondary(&csv, "finance", &mut FixedColumnType::new("3"))
        .unwrap();
    assert_eq!(count_inserted, 3);

    let conn = ws.connection();
    let names: Vec<String> = table_info(&conn, "finance")
        .into_iter()
        .map(|(name, ..)| name)
        .collect();
    assert_eq!(names, vec!["id", "UnitID", "Institution_Name", "Revenue"]);
    assert_eq!(count(&conn, "finance"), 3);

    let (table, from, to): (String, String, String) = conn
        .query_row(
            "SELECT \"table\", \"from\", \"to\" FROM pragma_foreign_key_list('finance')",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .unwrap();
    assert_eq!((table.as_str(), from.as_str(), to.as_str()), ("school", "UnitID", "UnitID"));

    let ids: Vec<i64> = conn
        .prepare("SELECT id FROM finance ORDER BY id")
        .unwrap()
        .query_map([], |r| r.get(0))
        .unwrap()
        .collect::<rusqlite::Result<_>>()
        .unwrap();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn test_secondary_import_without_primary_fails() {
    let ws = TestWorkspace::new();
    let mut populator = ws.populator();
    let csv = ws.write("schools.csv", SCHOOLS);

    let mut chooser = ScriptedChooser::default();
    let result = populator.import_secondary(&csv, "finance", &mut chooser);

    assert!(matches!(result, Err(Error::MissingPrimaryTable { .. })));
    assert!(chooser.asked.is_empty());
    assert!(populator.database().table_names().unwrap().is_empty());
}

#[test]
fn test_row_normalization() {
    let row = normalize([
        ("", "x".to_string()),
        ("Name", String::new()),
        ("UnitID", "7".to_string()),
    ]);
    assert_eq!(row.len(), 2);
    assert_eq!(row["Name"], None);
    assert_eq!(row["UnitID"], Some("7".to_string()));
}

// =============================================================================
// Failure modes
// =============================================================================

#[test]
fn test_second_primary_import_is_rejected() {
    let ws = TestWorkspace::new();
    let mut populator = ws.populator();
    let csv = import_schools(&ws, &mut populator);

    let result = populator.import_primary(&csv, &mut FixedColumnType::new("3"));
    assert!(matches!(result, Err(Error::DuplicateTable { table }) if table == "school"));
    assert_eq!(count(&ws.connection(), "school"), 3);
}

#[test]
fn test_malformed_value_leaves_empty_table() {
    let ws = TestWorkspace::new();
    let mut populator = ws.populator();
    import_schools(&ws, &mut populator);
    let csv = ws.write("enrollment.csv", "UnitID,Enrollment\n1,300\n2,lots\n");

    let result = populator.import_secondary(&csv, "enrollment", &mut FixedColumnType::new("1"));
    assert!(matches!(result, Err(Error::MalformedRow { line: 3, .. })));

    let conn = ws.connection();
    assert_eq!(count(&conn, "enrollment"), 0);
}

#[test]
fn test_unknown_identity_is_rejected_by_foreign_key() {
    let ws = TestWorkspace::new();
    let mut populator = ws.populator();
    import_schools(&ws, &mut populator);
    let csv = ws.write("enrollment.csv", "UnitID,Enrollment\n1,300\n99,12\n");

    let result = populator.import_secondary(&csv, "enrollment", &mut FixedColumnType::new("1"));
    assert!(matches!(result, Err(Error::Sqlite(_))));
    assert_eq!(count(&ws.connection(), "enrollment"), 0);
}

#[test]
fn test_primary_without_identity_column_is_rejected() {
    let ws = TestWorkspace::new();
    let mut populator = ws.populator();
    let csv = ws.write("schools.csv", "Name,Revenue\nA University,1\nB University,2\n");

    let mut chooser = ScriptedChooser::default();
    let result = populator.import_primary(&csv, &mut chooser);
    assert!(matches!(
        result,
        Err(Error::MissingIdentityHeader { table, header }) if table == "school" && header == "UnitID"
    ));
    assert!(chooser.asked.is_empty());
    assert!(populator.database().table_names().unwrap().is_empty());

    let result = populator.import_secondary(&csv, "finance", &mut FixedColumnType::new("3"));
    assert!(matches!(result, Err(Error::MissingPrimaryTable { .. })));
}

#[test]
fn test_blank_identity_value_is_rejected() {
    let ws = TestWorkspace::new();
    let mut populator = ws.populator();
    let csv = ws.write("schools.csv", "UnitID,Name\n,A University\n,B University\n");

    let result = populator.import_primary(&csv, &mut FixedColumnType::new("3"));
    assert!(matches!(
        result,
        Err(Error::MalformedRow { line: 2, ref column, .. }) if column == "UnitID"
    ));
    assert_eq!(count(&ws.connection(), "school"), 0);
}

#[test]
fn test_headers_without_a_name_get_no_column() {
    let ws = TestWorkspace::new();
    let mut populator = ws.populator();
    let csv = ws.write("schools.csv", "UnitID,(),Name\n1,x,A University\n");

    let mut chooser = FixedColumnType::wrap("3", ScriptedChooser::default());
    populator.import_primary(&csv, &mut chooser).unwrap();

    let names: Vec<String> = table_info(&ws.connection(), "school")
        .into_iter()
        .map(|(name, ..)| name)
        .collect();
    assert_eq!(names, vec!["UnitID", "Name"]);
    assert_eq!(count(&ws.connection(), "school"), 1);
}

#[test]
fn test_missing_csv() {
    let ws = TestWorkspace::new();
    let mut populator = ws.populator();
    let result = populator.import_primary(Path::new("nope.csv"), &mut FixedColumnType::new("3"));
    assert!(matches!(result, Err(Error::FileNotFound(_))));
}

// =============================================================================
// Directory import and menu
// =============================================================================

#[test]
fn test_directory_import() {
    let ws = TestWorkspace::new();
    let mut populator = ws.populator();
    import_schools(&ws, &mut populator);
    ws.write("datasets/admissions.csv", "UnitID,Applicants\n1,10\n2,20\n");
    ws.write("datasets/cost.CSV", "UnitID,Tuition (in state)\n3,9000.5\n");
    ws.write("datasets/notes.txt", "not a dataset");

    let mut chooser = FixedColumnType::wrap("2", ScriptedChooser::new(["apps", ""]));
    let imported = populator
        .import_directory(&ws.path("datasets"), &mut chooser)
        .unwrap();
    assert_eq!(
        imported,
        vec![("apps".to_string(), 2), ("cost".to_string(), 1)]
    );

    let conn = ws.connection();
    let tuition: f64 = conn
        .query_row("SELECT Tuition_in_state FROM cost", [], |r| r.get(0))
        .unwrap();
    assert_eq!(tuition, 9000.5);
}

#[test]
fn test_menu_session() {
    let ws = TestWorkspace::new();
    let csv = ws.write("schools.csv", SCHOOLS);
    let csv = csv.to_str().unwrap();
    let mut populator = ws.populator();

    let mut chooser = ScriptedChooser::new([
        // secondary before primary: reported, loop continues
        "2",
        // primary, with one invalid type code re-asked
        "1", csv, "3", "0", "2",
        // secondary named finance
        "2", csv, "finance", "3", "1",
        "4",
    ]);
    populator.run(&mut chooser).unwrap();
    assert_eq!(chooser.remaining(), 0);

    let conn = ws.connection();
    assert_eq!(count(&conn, "school"), 3);
    assert_eq!(count(&conn, "finance"), 3);
    let revenue: f64 = conn
        .query_row("SELECT Revenue FROM school WHERE UnitID = 1", [], |r| r.get(0))
        .unwrap();
    assert_eq!(revenue, 100000.0);
}
