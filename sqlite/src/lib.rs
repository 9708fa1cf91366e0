//! SQLite storage backend for quiz questions.
//!
//! Questions, their options, and the ordered links between them live in
//! three tables (see [`schema`]). Every question-level write touches two or
//! three of them and runs in one transaction, so a question is either
//! stored completely or not at all.
//!
//! # Architecture
//!
//! - **`schema`**: table layout, compatible with existing quiz databases
//! - **`migration`**: one-time creation, bootstrap, status, and seeding
//! - **`option`**: row operations on `options`
//! - **`link`**: ordered question → option association rows
//! - **`question`**: [`QuestionStore`], the transactional CRUD interface
//!
//! # Quick start
//!
//! ```no_run
//! use quiz_store_core::NewQuestion;
//! use quiz_store_sqlite::{QuestionStore, open_store};
//!
//! // Creates the tables and the example question on first use
//! let conn = open_store("data.sqlite3", true).unwrap();
//! let store = QuestionStore::new(&conn).unwrap();
//!
//! let id = store
//!     .create_question(
//!         &NewQuestion::new("Largest planet?")
//!             .with_option("Jupiter", true)
//!             .with_option("Mars", false),
//!     )
//!     .unwrap();
//!
//! for question in store.read_all_questions().unwrap() {
//!     println!("{}: {} ({} options)", question.id, question.body, question.options.len());
//! }
//! # let _ = id;
//! ```

mod error;
pub mod link;
mod migration;
pub mod option;
mod question;
pub mod schema;

pub use error::{ErrorKind, Result, StoreError};
pub use migration::{
    Migration, MigrationStatus, SeedReport, example_question, initialize, open_store,
};
pub use question::QuestionStore;
