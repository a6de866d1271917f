//! Schema setup: embedded diesel migrations plus ad-hoc SQL scripts.
//!
//! Scripts are applied statement by statement. A failing statement does not
//! stop the run; it is collected so the operator can apply it by hand.

use std::fmt::Write as _;
use std::path::Path;

use diesel::connection::SimpleConnection;
use diesel::sqlite::Sqlite;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use serde::Serialize;
use thiserror::Error;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("schema migrations failed: {0}")]
    Embedded(String),
    #[error("could not read SQL script: {0}")]
    Io(#[from] std::io::Error),
}

/// Apply pending embedded migrations; returns the applied versions.
pub fn run_embedded<C>(conn: &mut C) -> Result<Vec<String>, MigrationError>
where
    C: MigrationHarness<Sqlite>,
{
    let versions = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Embedded(err.to_string()))?;
    Ok(versions.into_iter().map(|version| version.to_string()).collect())
}

/// Statement that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedStatement {
    pub statement: String,
    pub error: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub applied: usize,
    /// Statements whose object already existed.
    pub skipped: usize,
    pub failed: Vec<FailedStatement>,
}

impl MigrationReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Text telling the operator how to finish the setup by hand.
    pub fn manual_instructions(&self) -> Option<String> {
        if self.failed.is_empty() {
            return None;
        }

        let mut text = format!(
            "{} statement(s) could not be applied. Run them manually against the database:\n",
            self.failed.len()
        );
        for (index, failed) in self.failed.iter().enumerate() {
            let _ = write!(
                text,
                "\n-- {}. {}\n{};\n",
                index + 1,
                failed.error,
                failed.statement
            );
        }
        Some(text)
    }
}

/// Split a script on `;` outside quotes and comments.
///
/// Comments are dropped; empty statements are skipped.
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut chars = sql.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' | '"' | '`' => {
                current.push(ch);
                while let Some(inner) = chars.next() {
                    current.push(inner);
                    if inner == ch {
                        // Doubled quote is an escaped quote.
                        if chars.peek() == Some(&ch) {
                            current.push(ch);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                }
            }
            '-' if chars.peek() == Some(&'-') => {
                for inner in chars.by_ref() {
                    if inner == '\n' {
                        current.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut previous = '\0';
                for inner in chars.by_ref() {
                    if previous == '*' && inner == '/' {
                        break;
                    }
                    previous = inner;
                }
                current.push(' ');
            }
            ';' => push_statement(&mut statements, &mut current),
            _ => current.push(ch),
        }
    }
    push_statement(&mut statements, &mut current);

    statements
}

fn push_statement(statements: &mut Vec<String>, current: &mut String) {
    let statement = current.trim();
    if !statement.is_empty() {
        statements.push(statement.to_string());
    }
    current.clear();
}

fn already_exists(error: &str) -> bool {
    error.to_ascii_lowercase().contains("already exists")
}

/// Execute statements in order, continuing after failures.
pub fn run_statements<C>(conn: &mut C, statements: &[String]) -> MigrationReport
where
    C: SimpleConnection + ?Sized,
{
    let mut report = MigrationReport::default();

    for statement in statements {
        match conn.batch_execute(statement) {
            Ok(()) => report.applied += 1,
            Err(err) if already_exists(&err.to_string()) => {
                log::info!("Skipping existing object: {err}");
                report.skipped += 1;
            }
            Err(err) => {
                log::error!("Statement failed: {err}");
                report.failed.push(FailedStatement {
                    statement: statement.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    report
}

/// Read a SQL script from disk.
pub fn read_script(path: &Path) -> Result<String, MigrationError> {
    Ok(std::fs::read_to_string(path)?)
}

/// Split and run a whole script.
pub fn run_script<C>(conn: &mut C, sql: &str) -> MigrationReport
where
    C: SimpleConnection + ?Sized,
{
    run_statements(conn, &split_statements(sql))
}

#[cfg(test)]
mod tests {
    use diesel::prelude::*;

    use super::*;

    fn memory() -> SqliteConnection {
        SqliteConnection::establish(":memory:").expect("in-memory database")
    }

    #[test]
    fn splits_outside_quotes_and_comments() {
        let sql = "
            -- stations; seeded below
            CREATE TABLE a (name TEXT DEFAULT 'x;y');
            /* block; comment */
            INSERT INTO a VALUES ('it''s; fine');
            ;
        ";

        let statements = split_statements(sql);

        assert_eq!(
            statements,
            vec![
                "CREATE TABLE a (name TEXT DEFAULT 'x;y')".to_string(),
                "INSERT INTO a VALUES ('it''s; fine')".to_string(),
            ]
        );
    }

    #[test]
    fn trailing_statement_without_semicolon_is_kept() {
        assert_eq!(
            split_statements("SELECT 1; SELECT 2"),
            vec!["SELECT 1".to_string(), "SELECT 2".to_string()]
        );
    }

    #[test]
    fn existing_objects_are_skipped_and_failures_collected() {
        let mut conn = memory();
        let script = "
            CREATE TABLE tanks (id INTEGER PRIMARY KEY);
            CREATE TABLE tanks (id INTEGER PRIMARY KEY);
            INSERT INTO missing VALUES (1);
            INSERT INTO tanks (id) VALUES (1);
        ";

        let report = run_script(&mut conn, script);

        assert_eq!(report.applied, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].statement.contains("missing"));
        assert!(!report.is_success());

        let instructions = report.manual_instructions().expect("instructions");
        assert!(instructions.contains("INSERT INTO missing VALUES (1);"));
    }

    #[test]
    fn embedded_migrations_apply_once() {
        let mut conn = memory();

        let first = run_embedded(&mut conn).expect("migrations");
        let second = run_embedded(&mut conn).expect("migrations");

        assert!(!first.is_empty());
        assert!(second.is_empty());
        assert_eq!(MigrationReport::default().manual_instructions(), None);
    }

    #[test]
    fn missing_script_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("seed.sql");

        assert!(matches!(read_script(&path), Err(MigrationError::Io(_))));

        std::fs::write(&path, "SELECT 1;").expect("write script");
        assert_eq!(read_script(&path).expect("readable"), "SELECT 1;");
    }
}
