//! Question bank loading from JSON and YAML files.
//!
//! A bank file holds one [`QuestionBank`]. The format is chosen by file
//! extension (`.json`, `.yaml`, `.yml`). Directories are loaded by merging
//! every bank file they contain in file-name order, so the resulting
//! question order is deterministic.
//!
//! ```no_run
//! use quiz_store_db::{load_bank, load_banks};
//!
//! // A single bundle
//! let bank = load_bank("banks/geography.json").unwrap();
//! println!("{} questions", bank.question_count());
//!
//! // A file or a directory of bundles
//! let merged = load_banks("banks/").unwrap();
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use quiz_store_core::{QuestionBank, validate_bank};
use tracing::{debug, info};

use crate::error::{DatabaseError, Result};

/// Serialization format of a bank file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankFormat {
    /// `.json`
    Json,
    /// `.yaml` or `.yml`
    Yaml,
}

impl BankFormat {
    /// Detects the format from a path's extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use quiz_store_db::BankFormat;
    ///
    /// assert_eq!(BankFormat::from_path("a.json"), Some(BankFormat::Json));
    /// assert_eq!(BankFormat::from_path("a.yml"), Some(BankFormat::Yaml));
    /// assert_eq!(BankFormat::from_path("a.txt"), None);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some("json") => Some(Self::Json),
            Some("yaml" | "yml") => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Loads and validates a single bank file.
///
/// # Errors
///
/// Returns [`DatabaseError::UnsupportedFormat`] for unknown extensions,
/// [`DatabaseError::IoError`], [`DatabaseError::JsonError`] or
/// [`DatabaseError::YamlError`] when reading fails, and
/// [`DatabaseError::InvalidBank`] when the bank does not validate.
pub fn load_bank(path: impl AsRef<Path>) -> Result<QuestionBank> {
    let path = path.as_ref();
    let format = BankFormat::from_path(path)
        .ok_or_else(|| DatabaseError::UnsupportedFormat(path.display().to_string()))?;

    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let bank: QuestionBank = match format {
        BankFormat::Json => serde_json::from_reader(reader)?,
        BankFormat::Yaml => serde_yaml::from_reader(reader)?,
    };

    if let Some(error) = validate_bank(&bank).into_iter().next() {
        return Err(DatabaseError::InvalidBank {
            path: path.display().to_string(),
            source: error,
        });
    }

    debug!(
        path = %path.display(),
        questions = bank.question_count(),
        "Loaded question bank"
    );
    Ok(bank)
}

/// Loads every bank file in a directory and merges them.
///
/// Files are processed in file-name order; files with other extensions are
/// ignored. The merged bank takes its version and name from the first file.
///
/// # Errors
///
/// Returns [`DatabaseError::NoBanksFound`] if the directory holds no bank
/// files, or the first error from [`load_bank`].
pub fn load_bank_dir(dir: impl AsRef<Path>) -> Result<QuestionBank> {
    let dir = dir.as_ref();
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && BankFormat::from_path(&path).is_some() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut merged: Option<QuestionBank> = None;
    for path in &paths {
        let bank = load_bank(path)?;
        match merged.as_mut() {
            Some(acc) => acc.extend(bank),
            None => merged = Some(bank),
        }
    }

    let merged = merged.ok_or_else(|| DatabaseError::NoBanksFound(dir.display().to_string()))?;
    info!(
        dir = %dir.display(),
        files = paths.len(),
        questions = merged.question_count(),
        "Loaded question bank directory"
    );
    Ok(merged)
}

/// Loads a bank from a file, or merges all banks in a directory.
pub fn load_banks(path: impl AsRef<Path>) -> Result<QuestionBank> {
    let path = path.as_ref();
    if path.is_dir() {
        load_bank_dir(path)
    } else {
        load_bank(path)
    }
}

/// Writes a bank, choosing the format from the path's extension.
pub fn write_bank(path: impl AsRef<Path>, bank: &QuestionBank) -> Result<()> {
    let path = path.as_ref();
    let format = BankFormat::from_path(path)
        .ok_or_else(|| DatabaseError::UnsupportedFormat(path.display().to_string()))?;

    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);
    match format {
        BankFormat::Json => serde_json::to_writer_pretty(writer, bank)?,
        BankFormat::Yaml => serde_yaml::to_writer(writer, bank)?,
    }
    Ok(())
}
