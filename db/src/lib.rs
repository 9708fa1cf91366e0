//! Store configuration and question bank loading for the quiz store.
//!
//! This crate holds the file-facing pieces that sit around the storage
//! backend: the YAML [`StoreConfig`] naming the database file, and loaders
//! for [`QuestionBank`](quiz_store_core::QuestionBank) bundles used to seed
//! or export a store.
//!
//! # Quick start
//!
//! ```no_run
//! use quiz_store_db::{StoreConfig, load_banks};
//!
//! // Config file, then QUIZ_STORE_DB override
//! let config = StoreConfig::resolve(None).unwrap();
//! println!("database: {}", config.database.display());
//!
//! // Load a bank file or a directory of bank files
//! let bank = load_banks("banks/").unwrap();
//! println!("{} questions to seed", bank.question_count());
//! ```

mod config;
mod error;
mod loader;

pub use config::{DATABASE_ENV, DEFAULT_CONFIG_FILE, DEFAULT_DATABASE, StoreConfig};
pub use error::{DatabaseError, Result};
pub use loader::{BankFormat, load_bank, load_bank_dir, load_banks, write_bank};
