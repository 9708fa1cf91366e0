//! Question and option type definitions.
//!
//! This module defines the data model shared by every storage backend and
//! surface of the quiz store. The persisted forms ([`Question`],
//! [`QuizOption`]) carry store-assigned ids; the insert forms
//! ([`NewQuestion`], [`NewOption`]) do not. All types serialize with
//! [`serde`] into the JSON shape used by the question API:
//!
//! ```json
//! {"id": 1, "body": "a", "options": [{"id": 1, "body": "b", "correct": true}]}
//! ```

use serde::{Deserialize, Serialize};

/// Version of the question bank contract (semver).
///
/// Embedded in every [`QuestionBank`](crate::QuestionBank) to track
/// compatibility of exported bundles.
pub const BANK_CONTRACT_VERSION: &str = "1.0.0";

fn is_unassigned(id: &i64) -> bool {
    *id == 0
}

/// A stored answer option.
///
/// The `id` is assigned by the store and changes every time the owning
/// question is updated. An id of `0` means "not yet persisted" and is
/// omitted from serialized output.
///
/// # Examples
///
/// ```
/// use quiz_store_core::QuizOption;
///
/// let option = QuizOption::new(7, "Paris", true);
/// assert_eq!(option.id, 7);
/// assert!(option.correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    /// Store-assigned identifier (`0` when not yet persisted).
    #[serde(default, skip_serializing_if = "is_unassigned")]
    pub id: i64,
    /// Option text shown to the player.
    pub body: String,
    /// Whether choosing this option is a correct answer.
    pub correct: bool,
}

impl QuizOption {
    /// Creates an option with a known id.
    pub fn new(id: i64, body: impl Into<String>, correct: bool) -> Self {
        Self {
            id,
            body: body.into(),
            correct,
        }
    }

    /// Returns `true` if this option has been assigned an id by the store.
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }
}

/// An option that has not been written yet.
///
/// # Examples
///
/// ```
/// use quiz_store_core::NewOption;
///
/// let option = NewOption::new("b", true);
/// assert_eq!(option.body, "b");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOption {
    /// Option text.
    pub body: String,
    /// Whether this option is a correct answer.
    pub correct: bool,
}

impl NewOption {
    /// Creates an unsaved option.
    pub fn new(body: impl Into<String>, correct: bool) -> Self {
        Self {
            body: body.into(),
            correct,
        }
    }
}

impl From<&QuizOption> for NewOption {
    fn from(option: &QuizOption) -> Self {
        Self {
            body: option.body.clone(),
            correct: option.correct,
        }
    }
}

/// A question together with its options in display order.
///
/// The order of [`options`](Question::options) is the order recorded in the
/// store and is never derived from option ids or content.
///
/// # Examples
///
/// ```
/// use quiz_store_core::{Question, QuizOption};
///
/// let mut question = Question::new(1, "Capital of France?");
/// question.options.push(QuizOption::new(1, "Paris", true));
/// question.options.push(QuizOption::new(2, "Lyon", false));
///
/// assert_eq!(question.option_ids(), vec![1, 2]);
/// assert_eq!(question.correct_options().count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Store-assigned identifier of the question body row.
    #[serde(default, skip_serializing_if = "is_unassigned")]
    pub id: i64,
    /// Question text.
    pub body: String,
    /// Options in display order.
    #[serde(default)]
    pub options: Vec<QuizOption>,
}

impl Question {
    /// Creates a question with no options.
    pub fn new(id: i64, body: impl Into<String>) -> Self {
        Self {
            id,
            body: body.into(),
            options: Vec::new(),
        }
    }

    /// Returns the ids of the options in display order.
    pub fn option_ids(&self) -> Vec<i64> {
        self.options.iter().map(|o| o.id).collect()
    }

    /// Iterates over the options marked correct.
    pub fn correct_options(&self) -> impl Iterator<Item = &QuizOption> {
        self.options.iter().filter(|o| o.correct)
    }

    /// Looks up an option by id.
    pub fn find_option(&self, id: i64) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.id == id)
    }
}

/// A question that has not been written yet.
///
/// Use [`with_option`](NewQuestion::with_option) to append options in the
/// order they should be displayed.
///
/// # Examples
///
/// ```
/// use quiz_store_core::NewQuestion;
///
/// let question = NewQuestion::new("a")
///     .with_option("b", true)
///     .with_option("c", false);
///
/// assert_eq!(question.options.len(), 2);
/// assert_eq!(question.options[1].body, "c");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    /// Question text.
    pub body: String,
    /// Options in display order.
    #[serde(default)]
    pub options: Vec<NewOption>,
}

impl NewQuestion {
    /// Creates an unsaved question with no options.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            options: Vec::new(),
        }
    }

    /// Appends an option.
    pub fn with_option(mut self, body: impl Into<String>, correct: bool) -> Self {
        self.options.push(NewOption::new(body, correct));
        self
    }
}

impl From<&Question> for NewQuestion {
    fn from(question: &Question) -> Self {
        Self {
            body: question.body.clone(),
            options: question.options.iter().map(NewOption::from).collect(),
        }
    }
}
