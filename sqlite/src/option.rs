//! Row-level operations on the `options` table.
//!
//! Writers take a plain [`Connection`] so callers can pass a
//! [`Transaction`](rusqlite::Transaction) (which derefs to one) and keep the
//! decision to commit or roll back for themselves.

use quiz_store_core::QuizOption;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::error::{Result, StoreError};

/// Inserts an option row and returns its generated id.
pub fn create_option(conn: &Connection, body: &str, correct: bool) -> Result<i64> {
    conn.execute(
        "INSERT INTO options (body, correct) VALUES (?1, ?2)",
        params![body, correct],
    )?;
    let id = conn.last_insert_rowid();
    debug!(option_id = id, "Inserted option");
    Ok(id)
}

/// Loads one option by id.
///
/// # Errors
///
/// Returns [`StoreError::OptionNotFound`] if no row has the id.
pub fn read_option(conn: &Connection, id: i64) -> Result<QuizOption> {
    conn.query_row(
        "SELECT id, body, correct FROM options WHERE id = ?1",
        params![id],
        |row| {
            Ok(QuizOption {
                id: row.get(0)?,
                body: row.get(1)?,
                correct: row.get(2)?,
            })
        },
    )
    .optional()?
    .ok_or(StoreError::OptionNotFound(id))
}

/// Deletes one option by id and returns the number of rows removed.
///
/// Deleting an id that does not exist is not an error.
pub fn delete_option(conn: &Connection, id: i64) -> Result<usize> {
    let removed = conn.execute("DELETE FROM options WHERE id = ?1", params![id])?;
    Ok(removed)
}
