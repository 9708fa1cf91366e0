//! Question-level CRUD over the three quiz tables.
//!
//! Provides [`QuestionStore`], which orchestrates the [`option`] and
//! [`link`] row operations. Every write runs inside one transaction that is
//! committed only when all of its steps succeed and rolled back explicitly
//! otherwise, so readers never observe a half-written question.
//!
//! # Example
//!
//! ```no_run
//! use quiz_store_core::NewQuestion;
//! use quiz_store_sqlite::{QuestionStore, open_store};
//!
//! let conn = open_store("data.sqlite3", false).unwrap();
//! let store = QuestionStore::new(&conn).unwrap();
//!
//! let id = store
//!     .create_question(&NewQuestion::new("a").with_option("b", true))
//!     .unwrap();
//!
//! let mut question = store.read_question(id).unwrap();
//! question.options[0].body = "B".into();
//! store.update_question(&question).unwrap();
//!
//! let question = store.read_question(id).unwrap();
//! store.delete_question(&question).unwrap();
//! ```

use quiz_store_core::{
    NewQuestion, Question, QuestionBank, QuizOption, ValidationError, validate_question_ids,
};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::{link, option};

/// Query interface for reading and writing questions.
///
/// Wraps a borrowed connection. Construction enables foreign key checks on
/// that connection; each write transaction defers them to commit time so
/// the manual delete order (options, links, body) stays legal.
///
/// # Identity churn
///
/// [`update_question`](Self::update_question) replaces every option row of
/// the question, so option ids change on every update even when the content
/// does not. Callers must re-read a question after updating it before they
/// update or delete it again.
pub struct QuestionStore<'a> {
    conn: &'a Connection,
}

impl<'a> QuestionStore<'a> {
    /// Creates a store over an initialized connection.
    pub fn new(conn: &'a Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Creates a question with its options and returns the question id.
    ///
    /// Options keep the order of `question.options`. Any body text is
    /// stored as given, including the empty string.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DatabaseError`] if any insert fails, in which
    /// case nothing from this call is kept.
    pub fn create_question(&self, question: &NewQuestion) -> Result<i64> {
        let id = in_transaction(self.conn, "create_question", |tx| {
            insert_question(tx, question)
        })?;

        info!(
            question_id = id,
            options = question.options.len(),
            "Created question"
        );
        Ok(id)
    }

    /// Loads a question and its options in stored order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::QuestionNotFound`] if no question has the id,
    /// or [`StoreError::DanglingLink`] if a link row points at a missing
    /// option.
    pub fn read_question(&self, id: i64) -> Result<Question> {
        let body: String = self
            .conn
            .query_row(
                "SELECT body FROM question_bodies WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(StoreError::QuestionNotFound(id))?;

        let options = load_options(self.conn, id)?;
        Ok(Question { id, body, options })
    }

    /// Loads every question in row order.
    ///
    /// Returns an empty vector if the store holds no questions.
    pub fn read_all_questions(&self) -> Result<Vec<Question>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, body FROM question_bodies ORDER BY id")?;

        let rows: Vec<(i64, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut questions = Vec::with_capacity(rows.len());
        for (id, body) in rows {
            let options = load_options(self.conn, id)?;
            questions.push(Question { id, body, options });
        }
        Ok(questions)
    }

    /// Replaces a question's body and all of its options.
    ///
    /// The stored options and links of the question are deleted and fresh
    /// option rows are created from `question.options`, in that order. Options
    /// with id `0` are accepted as additions; every non-zero option id must
    /// currently belong to this question.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::QuestionNotFound`] if the question does not
    /// exist, or [`StoreError::ValidationError`] for a non-positive question
    /// id, a negative or repeated option id, or an option id that belongs
    /// elsewhere ([`ValidationError::ForeignOption`]). Nothing is changed on
    /// error.
    pub fn update_question(&self, question: &Question) -> Result<()> {
        reject_invalid(validate_question_ids(question))?;

        let new_ids = in_transaction(self.conn, "update_question", |tx| {
            let updated = tx.execute(
                "UPDATE question_bodies SET body = ?1 WHERE id = ?2",
                params![question.body, question.id],
            )?;
            if updated == 0 {
                return Err(StoreError::QuestionNotFound(question.id));
            }

            let stored_ids = link::read_linked_option_ids(tx, question.id)?;
            check_ownership(question, &stored_ids)?;

            link::delete_links_for_question(tx, question.id)?;
            for id in &stored_ids {
                option::delete_option(tx, *id)?;
            }

            let new_ids = create_options(
                tx,
                question.options.iter().map(|o| (o.body.as_str(), o.correct)),
            )?;
            link::create_links(tx, question.id, &new_ids)?;
            Ok(new_ids)
        })?;

        info!(
            question_id = question.id,
            options = new_ids.len(),
            "Updated question"
        );
        Ok(())
    }

    /// Deletes a question, its options, and its links.
    ///
    /// Options are removed first, then links, then the question body row.
    /// The options deleted are the ones currently linked in the store;
    /// every non-zero option id in `question` must be among them.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::QuestionNotFound`] if the question does not
    /// exist, or [`StoreError::ValidationError`] with
    /// [`ValidationError::ForeignOption`] if an option id is stale or
    /// belongs elsewhere. Nothing is changed on error.
    pub fn delete_question(&self, question: &Question) -> Result<()> {
        if question.id <= 0 {
            return Err(ValidationError::InvalidQuestionId(question.id).into());
        }

        let removed_options = in_transaction(self.conn, "delete_question", |tx| {
            let stored_ids = link::read_linked_option_ids(tx, question.id)?;
            check_ownership(question, &stored_ids)?;

            for id in &stored_ids {
                option::delete_option(tx, *id)?;
            }
            link::delete_links_for_question(tx, question.id)?;

            let removed = tx.execute(
                "DELETE FROM question_bodies WHERE id = ?1",
                params![question.id],
            )?;
            if removed == 0 {
                return Err(StoreError::QuestionNotFound(question.id));
            }
            Ok(stored_ids.len())
        })?;

        info!(
            question_id = question.id,
            options = removed_options,
            "Deleted question"
        );
        Ok(())
    }

    /// Reads a question by id, then deletes it.
    pub fn delete_question_by_id(&self, id: i64) -> Result<Question> {
        let question = self.read_question(id)?;
        self.delete_question(&question)?;
        Ok(question)
    }

    /// Exports every stored question as a bank, dropping ids.
    pub fn export_bank(&self, version: impl Into<String>) -> Result<QuestionBank> {
        let mut bank = QuestionBank::new(version);
        bank.questions = self
            .read_all_questions()?
            .iter()
            .map(NewQuestion::from)
            .collect();
        Ok(bank)
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        self.conn
    }
}

/// Runs `f` inside a transaction, committing on success and rolling back
/// explicitly on failure.
pub(crate) fn in_transaction<T>(
    conn: &Connection,
    operation: &'static str,
    f: impl FnOnce(&Transaction<'_>) -> Result<T>,
) -> Result<T> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch("PRAGMA defer_foreign_keys = ON;")?;

    match f(&tx) {
        Ok(value) => {
            // A failed COMMIT leaves the transaction open; dropping `tx`
            // then rolls it back.
            tx.commit()?;
            Ok(value)
        }
        Err(err) => {
            warn!(operation, error = %err, "Rolling back transaction");
            if let Err(rollback_err) = tx.rollback() {
                warn!(operation, error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}

/// Writes a question body, its options, and its links without opening a
/// transaction of its own.
pub(crate) fn insert_question(conn: &Connection, question: &NewQuestion) -> Result<i64> {
    conn.execute(
        "INSERT INTO question_bodies (body) VALUES (?1)",
        params![question.body],
    )?;
    let question_id = conn.last_insert_rowid();

    let option_ids = create_options(
        conn,
        question.options.iter().map(|o| (o.body.as_str(), o.correct)),
    )?;
    link::create_links(conn, question_id, &option_ids)?;

    debug!(question_id, options = option_ids.len(), "Inserted question");
    Ok(question_id)
}

fn create_options<'o>(
    conn: &Connection,
    options: impl Iterator<Item = (&'o str, bool)>,
) -> Result<Vec<i64>> {
    options
        .map(|(body, correct)| option::create_option(conn, body, correct))
        .collect()
}

/// Resolves the linked options of a question in stored order.
fn load_options(conn: &Connection, question_id: i64) -> Result<Vec<QuizOption>> {
    let option_ids = link::read_linked_option_ids(conn, question_id)?;

    let mut options = Vec::with_capacity(option_ids.len());
    for option_id in option_ids {
        let option = option::read_option(conn, option_id).map_err(|err| match err {
            StoreError::OptionNotFound(_) => StoreError::DanglingLink {
                question_id,
                option_id,
            },
            other => other,
        })?;
        options.push(option);
    }
    Ok(options)
}

/// Every persisted option id in `question` must be linked to it in the store.
fn check_ownership(question: &Question, stored_ids: &[i64]) -> Result<()> {
    if let Some(foreign) = question
        .options
        .iter()
        .find(|o| o.is_persisted() && !stored_ids.contains(&o.id))
    {
        return Err(ValidationError::ForeignOption {
            question_id: question.id,
            option_id: foreign.id,
        }
        .into());
    }
    Ok(())
}

fn reject_invalid(errors: Vec<ValidationError>) -> Result<()> {
    match errors.into_iter().next() {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}
