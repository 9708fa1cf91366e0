//! Question and bank validation.
//!
//! Two layers of checks live here. [`validate_question_ids`] guards the
//! identity rules every stored question must satisfy (positive question id,
//! non-negative and unique option ids) and is what storage backends enforce.
//! [`validate_new_question`], [`validate_question`] and [`validate_bank`]
//! additionally reject blank bodies; they are meant for input surfaces such
//! as the command line and bank files. Storage accepts any body text.
//!
//! # Examples
//!
//! ```
//! use quiz_store_core::*;
//!
//! let question = NewQuestion::new("a").with_option("b", true);
//! assert!(validate_new_question(&question).is_empty());
//!
//! // Invalid: blank option body
//! let bad = NewQuestion::new("a").with_option("  ", true);
//! assert!(!validate_new_question(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{NewOption, NewQuestion, Question, QuestionBank};

/// Question/bank validation errors.
///
/// Each variant describes a specific problem with caller-supplied input.
/// The `Display` impl provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Bank version string is empty.
    #[error("bank version cannot be empty")]
    EmptyBankVersion,
    /// Question body is empty or whitespace-only.
    #[error("question body cannot be empty")]
    EmptyQuestionBody,
    /// Option body at the given position is empty or whitespace-only.
    #[error("option {0} body cannot be empty")]
    EmptyOptionBody(usize),
    /// Question id is zero or negative.
    #[error("invalid question id: {0}")]
    InvalidQuestionId(i64),
    /// Option id is negative.
    #[error("invalid option id: {0}")]
    InvalidOptionId(i64),
    /// The same persisted option id appears twice in one question.
    #[error("duplicate option id in question: {0}")]
    DuplicateOptionId(i64),
    /// An option id that is not linked to the question being written.
    #[error("option {option_id} does not belong to question {question_id}")]
    ForeignOption { question_id: i64, option_id: i64 },
    /// An id supplied as text could not be parsed.
    #[error("unparseable id: {0}")]
    UnparseableId(String),
}

/// Parses a textual id, as received from a request path or command line.
///
/// # Examples
///
/// ```
/// use quiz_store_core::{parse_id, ValidationError};
///
/// assert_eq!(parse_id("42"), Ok(42));
/// assert_eq!(parse_id("x"), Err(ValidationError::UnparseableId("x".into())));
/// assert_eq!(parse_id("0"), Err(ValidationError::InvalidQuestionId(0)));
/// ```
pub fn parse_id(raw: &str) -> Result<i64, ValidationError> {
    let id: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::UnparseableId(raw.to_string()))?;
    if id <= 0 {
        return Err(ValidationError::InvalidQuestionId(id));
    }
    Ok(id)
}

/// Validates a question bank.
///
/// Checks for an empty version string, then validates each question and
/// stops at the first failing one.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if bank.version.trim().is_empty() {
        errors.push(ValidationError::EmptyBankVersion);
        return errors;
    }

    for question in &bank.questions {
        errors.extend(validate_new_question(question));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

/// Validates user input for a question that is about to be created.
///
/// Rejects a blank question body, then the first blank option body.
pub fn validate_new_question(question: &NewQuestion) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if question.body.trim().is_empty() {
        errors.push(ValidationError::EmptyQuestionBody);
        return errors;
    }

    errors.extend(validate_option_bodies(&question.options));
    errors
}

/// Checks the identity rules of a persisted question.
///
/// Options with id `0` are treated as new; persisted ids must be positive
/// and unique within the question. Bodies are not inspected.
///
/// # Examples
///
/// ```
/// use quiz_store_core::*;
///
/// let mut question = Question::new(1, "");
/// question.options.push(QuizOption::new(2, "b", true));
/// question.options.push(QuizOption::new(2, "c", false));
///
/// assert_eq!(
///     validate_question_ids(&question),
///     vec![ValidationError::DuplicateOptionId(2)]
/// );
/// ```
pub fn validate_question_ids(question: &Question) -> Vec<ValidationError> {
    if question.id <= 0 {
        return vec![ValidationError::InvalidQuestionId(question.id)];
    }

    let mut seen = HashSet::new();
    for option in &question.options {
        if option.id < 0 {
            return vec![ValidationError::InvalidOptionId(option.id)];
        }
        if option.id != 0 && !seen.insert(option.id) {
            return vec![ValidationError::DuplicateOptionId(option.id)];
        }
    }

    Vec::new()
}

/// Validates user input for a question that is about to be updated.
///
/// Runs [`validate_question_ids`], then rejects blank bodies.
pub fn validate_question(question: &Question) -> Vec<ValidationError> {
    let errors = validate_question_ids(question);
    if !errors.is_empty() {
        return errors;
    }

    if question.body.trim().is_empty() {
        return vec![ValidationError::EmptyQuestionBody];
    }

    question
        .options
        .iter()
        .position(|o| o.body.trim().is_empty())
        .map(ValidationError::EmptyOptionBody)
        .into_iter()
        .collect()
}

fn validate_option_bodies(options: &[NewOption]) -> Vec<ValidationError> {
    options
        .iter()
        .position(|o| o.body.trim().is_empty())
        .map(ValidationError::EmptyOptionBody)
        .into_iter()
        .collect()
}
