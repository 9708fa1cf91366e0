//! Ordered association between a question and its options.
//!
//! Each row of the `questions` table says "option `option_id` is at position
//! `option_order` within question `question_id`". Positions are 0-based and
//! follow the order of the slice passed to [`create_links`].

use rusqlite::{Connection, params};
use tracing::debug;

use crate::error::Result;

/// Inserts one link row per option id, using the slice position as order.
///
/// Stops at the first failing insert. Rows already inserted are left for the
/// caller's transaction to discard.
pub fn create_links(conn: &Connection, question_id: i64, option_ids: &[i64]) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO questions (question_id, option_id, option_order) VALUES (?1, ?2, ?3)",
    )?;
    for (order, option_id) in option_ids.iter().enumerate() {
        stmt.execute(params![question_id, option_id, order as i64])?;
    }
    debug!(question_id, links = option_ids.len(), "Inserted links");
    Ok(())
}

/// Returns the option ids linked to a question, by ascending order.
pub fn read_linked_option_ids(conn: &Connection, question_id: i64) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT option_id FROM questions WHERE question_id = ?1 ORDER BY option_order ASC",
    )?;
    let ids = stmt
        .query_map(params![question_id], |row| row.get::<_, i64>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ids)
}

/// Deletes every link row of a question and returns how many were removed.
pub fn delete_links_for_question(conn: &Connection, question_id: i64) -> Result<usize> {
    let removed = conn.execute(
        "DELETE FROM questions WHERE question_id = ?1",
        params![question_id],
    )?;
    Ok(removed)
}

/// Deletes a single link row and returns how many were removed (0 or 1).
pub fn delete_link(conn: &Connection, question_id: i64, option_id: i64) -> Result<usize> {
    let removed = conn.execute(
        "DELETE FROM questions WHERE question_id = ?1 AND option_id = ?2",
        params![question_id, option_id],
    )?;
    Ok(removed)
}
