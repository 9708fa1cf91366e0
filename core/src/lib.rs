//! Core question types and shared question bank primitives.
//!
//! This crate defines the data model of the quiz store:
//!
//! - [`Question`]: a stored question with its options in display order.
//! - [`QuizOption`]: a stored answer option (body text plus correctness).
//! - [`NewQuestion`] / [`NewOption`]: the same shapes before the store has
//!   assigned ids.
//! - [`QuestionBank`]: a versioned bundle of questions for seeding and
//!   export.
//!
//! Validation comes in two layers: [`validate_question_ids`] holds the
//! identity rules storage enforces, while [`validate_new_question`],
//! [`validate_question`] and [`validate_bank`] also reject blank bodies in
//! user input.
//!
//! # Example
//!
//! ```
//! use quiz_store_core::*;
//!
//! let question = NewQuestion::new("Which are primes?")
//!     .with_option("2", true)
//!     .with_option("4", false)
//!     .with_option("5", true);
//!
//! assert!(validate_new_question(&question).is_empty());
//! assert_eq!(question.options.iter().filter(|o| o.correct).count(), 2);
//! ```

mod package;
mod types;
mod validate;

pub use package::QuestionBank;
pub use types::*;
pub use validate::{
    ValidationError, parse_id, validate_bank, validate_new_question, validate_question,
    validate_question_ids,
};
