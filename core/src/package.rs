use serde::{Deserialize, Serialize};

use crate::NewQuestion;

/// Serializable bundle of questions used for seeding and export.
///
/// A bank groups multiple [`NewQuestion`] values with version metadata so a
/// whole question set can be written to a single JSON or YAML file and
/// inserted into a store in one transaction.
///
/// # Examples
///
/// ```
/// use quiz_store_core::*;
///
/// let mut bank = QuestionBank::new("1.0.0");
/// bank.name = Some("geography".into());
/// bank.questions.push(NewQuestion::new("Capital of France?").with_option("Paris", true));
/// bank.questions.push(NewQuestion::new("Capital of Italy?").with_option("Rome", true));
///
/// assert_eq!(bank.question_count(), 2);
/// assert_eq!(bank.option_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    /// Bank contract version (populated from
    /// [`BANK_CONTRACT_VERSION`](crate::BANK_CONTRACT_VERSION)).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_version: Option<String>,
    /// Bank content version (free-form, usually semver).
    pub version: String,
    /// Optional bank name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Questions in insertion order.
    #[serde(default)]
    pub questions: Vec<NewQuestion>,
}

impl QuestionBank {
    /// Creates an empty bank.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            contract_version: Some(crate::BANK_CONTRACT_VERSION.to_string()),
            version: version.into(),
            name: None,
            questions: Vec::new(),
        }
    }

    /// Returns the number of questions in this bank.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Returns the total number of options across all questions.
    pub fn option_count(&self) -> usize {
        self.questions.iter().map(|q| q.options.len()).sum()
    }

    /// Appends every question of `other` after this bank's questions.
    pub fn extend(&mut self, other: QuestionBank) {
        self.questions.extend(other.questions);
    }
}
