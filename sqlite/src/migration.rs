//! Schema lifecycle and seeding for the quiz store.
//!
//! Provides [`initialize`] for one-time table creation, [`Migration`] for
//! status reporting and bulk seeding, and [`open_store`], which opens a
//! database file and bootstraps it on first use.
//!
//! # Example
//!
//! ```no_run
//! use quiz_store_sqlite::Migration;
//! use rusqlite::Connection;
//!
//! let conn = Connection::open("data.sqlite3").unwrap();
//! let mut migration = Migration::new(conn).unwrap();
//!
//! // Create tables and seed the example question, once
//! migration.bootstrap(true).unwrap();
//!
//! let status = migration.status().unwrap();
//! println!("Questions: {}", status.question_count);
//! ```

use std::path::Path;

use quiz_store_core::{NewQuestion, QuestionBank, validate_bank};
use rusqlite::Connection;
use tracing::info;

use crate::error::{Result, StoreError};
use crate::question::{in_transaction, insert_question};
use crate::schema::{LINKS_TABLE, OPTIONS_TABLE, QUESTION_BODIES_TABLE, schema_statements};

/// Creates the three quiz tables.
///
/// Runs inside a single transaction. The statements are plain
/// `CREATE TABLE`, so calling this on an initialized store fails; callers
/// check [`Migration::status`] or use [`Migration::bootstrap`].
///
/// # Errors
///
/// Returns [`StoreError::MigrationError`] naming the table whose creation
/// failed. The store cannot be used after such a failure.
pub fn initialize(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    create_tables(&tx)?;
    tx.commit()?;
    info!("Created quiz tables");
    Ok(())
}

/// Runs the schema statements without opening a transaction of its own.
fn create_tables(conn: &Connection) -> Result<()> {
    for (table, sql) in schema_statements() {
        conn.execute_batch(sql).map_err(|e| {
            StoreError::MigrationError(format!("failed to create table '{table}': {e}"))
        })?;
    }
    Ok(())
}

/// The question seeded into a freshly created store.
pub fn example_question() -> NewQuestion {
    NewQuestion::new("a")
        .with_option("b", true)
        .with_option("c", false)
}

/// Opens a database file, bootstrapping it if it has no quiz tables yet.
///
/// When `seed_example` is set, a fresh store also receives
/// [`example_question`].
pub fn open_store(path: impl AsRef<Path>, seed_example: bool) -> Result<Connection> {
    let path = path.as_ref();
    let conn = Connection::open(path)?;
    let mut migration = Migration::new(conn)?;
    if migration.bootstrap(seed_example)? {
        info!(path = %path.display(), "Bootstrapped new quiz store");
    }
    Ok(migration.into_connection())
}

/// Manages table creation, status and seeding for one connection.
pub struct Migration {
    conn: Connection,
}

impl Migration {
    /// Wraps a connection and enables foreign key checks on it.
    pub fn new(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Creates the quiz tables. See [`initialize`].
    pub fn up(&mut self) -> Result<()> {
        initialize(&self.conn)
    }

    /// Creates the tables, and optionally seeds the example question, when
    /// they do not exist yet.
    ///
    /// Table creation and the seed share one transaction: if seeding fails
    /// the tables are not created either, so the next call starts over.
    ///
    /// Returns `true` if the store was created by this call.
    pub fn bootstrap(&mut self, seed_example: bool) -> Result<bool> {
        if self.tables_exist()? {
            return Ok(false);
        }

        in_transaction(&self.conn, "bootstrap", |tx| {
            create_tables(tx)?;
            if seed_example {
                insert_question(tx, &example_question())?;
            }
            Ok(())
        })?;

        info!(seed_example, "Created quiz tables");
        Ok(true)
    }

    /// Returns whether the tables exist and how many rows each holds.
    pub fn status(&self) -> Result<MigrationStatus> {
        if !self.tables_exist()? {
            return Ok(MigrationStatus::default());
        }

        Ok(MigrationStatus {
            tables_exist: true,
            question_count: self.count_rows(QUESTION_BODIES_TABLE)?,
            option_count: self.count_rows(OPTIONS_TABLE)?,
            link_count: self.count_rows(LINKS_TABLE)?,
        })
    }

    /// Inserts every question of a bank within a single transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ValidationError`] if the bank does not
    /// validate, or [`StoreError::DatabaseError`] if any insert fails, in
    /// which case no question from the bank is kept.
    pub fn seed(&mut self, bank: &QuestionBank) -> Result<SeedReport> {
        if let Some(error) = validate_bank(bank).into_iter().next() {
            return Err(error.into());
        }

        let report = in_transaction(&self.conn, "seed", |tx| {
            let mut report = SeedReport::default();
            for question in &bank.questions {
                let id = insert_question(tx, question)?;
                report.question_ids.push(id);
                report.questions_inserted += 1;
                report.options_inserted += question.options.len();
            }
            Ok(report)
        })?;

        info!(
            questions = report.questions_inserted,
            options = report.options_inserted,
            "Seeded question bank"
        );
        Ok(report)
    }

    /// Loads a bank file or directory and seeds it.
    pub fn seed_from(&mut self, path: impl AsRef<Path>) -> Result<SeedReport> {
        let bank = quiz_store_db::load_banks(path)?;
        self.seed(&bank)
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consumes the migration and returns the underlying connection.
    pub fn into_connection(self) -> Connection {
        self.conn
    }

    /// Checks whether all three quiz tables exist.
    fn tables_exist(&self) -> Result<bool> {
        let mut stmt = self.conn.prepare(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN (?1, ?2, ?3)",
        )?;
        let count: i64 = stmt.query_row(
            [OPTIONS_TABLE, QUESTION_BODIES_TABLE, LINKS_TABLE],
            |row| row.get(0),
        )?;
        Ok(count == 3)
    }

    fn count_rows(&self, table: &str) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })?;
        Ok(count as usize)
    }
}

/// Snapshot of the store's tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Whether all quiz tables exist.
    pub tables_exist: bool,
    /// Rows in `question_bodies`.
    pub question_count: usize,
    /// Rows in `options`.
    pub option_count: usize,
    /// Rows in the `questions` link table.
    pub link_count: usize,
}

/// Report of a seed operation.
#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    /// Number of questions inserted.
    pub questions_inserted: usize,
    /// Number of options inserted.
    pub options_inserted: usize,
    /// Ids of the inserted questions, in bank order.
    pub question_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_on_empty_database() {
        let conn = Connection::open_in_memory().unwrap();
        let migration = Migration::new(conn).unwrap();
        assert_eq!(migration.status().unwrap(), MigrationStatus::default());
    }

    #[test]
    fn test_up_and_status() {
        let conn = Connection::open_in_memory().unwrap();
        let mut migration = Migration::new(conn).unwrap();
        migration.up().unwrap();

        let status = migration.status().unwrap();
        assert!(status.tables_exist);
        assert_eq!(status.question_count, 0);
        assert_eq!(status.option_count, 0);
        assert_eq!(status.link_count, 0);
    }

    #[test]
    fn test_second_initialize_fails() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        assert!(matches!(
            initialize(&conn),
            Err(StoreError::MigrationError(_))
        ));
    }

    #[test]
    fn test_bootstrap_runs_once() {
        let conn = Connection::open_in_memory().unwrap();
        let mut migration = Migration::new(conn).unwrap();

        assert!(migration.bootstrap(true).unwrap());
        assert!(!migration.bootstrap(true).unwrap());

        let status = migration.status().unwrap();
        assert_eq!(status.question_count, 1);
        assert_eq!(status.option_count, 2);
        assert_eq!(status.link_count, 2);
    }

    #[test]
    fn test_failed_bootstrap_seed_creates_no_tables() {
        let conn = Connection::open_in_memory().unwrap();
        // Unqualified inserts into `questions` resolve to this temp table
        // first, so the link insert of the seed fails.
        conn.execute_batch("CREATE TEMP TABLE questions (unrelated INTEGER);")
            .unwrap();
        let mut migration = Migration::new(conn).unwrap();

        assert!(migration.bootstrap(true).is_err());
        assert!(!migration.status().unwrap().tables_exist);
        assert!(migration.connection().is_autocommit());

        migration
            .connection()
            .execute_batch("DROP TABLE temp.questions;")
            .unwrap();
        assert!(migration.bootstrap(true).unwrap());

        let status = migration.status().unwrap();
        assert_eq!(status.question_count, 1);
        assert_eq!(status.option_count, 2);
        assert_eq!(status.link_count, 2);
    }

    #[test]
    fn test_bootstrap_without_seed() {
        let conn = Connection::open_in_memory().unwrap();
        let mut migration = Migration::new(conn).unwrap();
        migration.bootstrap(false).unwrap();
        assert_eq!(migration.status().unwrap().question_count, 0);
    }

    #[test]
    fn test_seed_rejects_invalid_bank() {
        let conn = Connection::open_in_memory().unwrap();
        let mut migration = Migration::new(conn).unwrap();
        migration.up().unwrap();

        let mut bank = QuestionBank::new("1.0.0");
        bank.questions.push(NewQuestion::new("fine"));
        bank.questions.push(NewQuestion::new(""));

        assert!(matches!(
            migration.seed(&bank),
            Err(StoreError::ValidationError(_))
        ));
        assert_eq!(migration.status().unwrap().question_count, 0);
    }
}
