//! SQL schema for the quiz store.
//!
//! The layout matches existing quiz databases byte for byte, so files
//! created by earlier deployments open unchanged.
//!
//! # Table structure
//!
//! - `options`: one row per answer option (body text, correctness flag)
//! - `question_bodies`: one row per question (body text)
//! - `questions`: link rows `(question_id, option_id, option_order)`; the
//!   only place option order is recorded
//!
//! Foreign keys on `questions` are declared, not cascading. Deletes are
//! sequenced by hand inside a transaction.

/// Name of the options table.
pub const OPTIONS_TABLE: &str = "options";

/// Name of the question bodies table.
pub const QUESTION_BODIES_TABLE: &str = "question_bodies";

/// Name of the link table.
pub const LINKS_TABLE: &str = "questions";

const CREATE_OPTIONS: &str = r#"
CREATE TABLE "options" (
    "id"	INTEGER NOT NULL UNIQUE,
    "body"	TEXT NOT NULL,
    "correct"	INTEGER NOT NULL,
    PRIMARY KEY("id" AUTOINCREMENT)
)
"#;

const CREATE_QUESTION_BODIES: &str = r#"
CREATE TABLE "question_bodies" (
    "id"	INTEGER NOT NULL UNIQUE,
    "body"	TEXT NOT NULL,
    PRIMARY KEY("id")
)
"#;

const CREATE_LINKS: &str = r#"
CREATE TABLE "questions" (
    "question_id"	INTEGER NOT NULL,
    "option_id"	INTEGER NOT NULL,
    "option_order"	INTEGER,
    FOREIGN KEY("question_id") REFERENCES "question_bodies"("id"),
    FOREIGN KEY("option_id") REFERENCES "options"("id"),
    UNIQUE("option_id","question_id","option_order"),
    PRIMARY KEY("question_id","option_id")
)
"#;

/// Returns the schema statements in creation order, each paired with the
/// table it creates.
pub(crate) fn schema_statements() -> [(&'static str, &'static str); 3] {
    [
        (OPTIONS_TABLE, CREATE_OPTIONS),
        (QUESTION_BODIES_TABLE, CREATE_QUESTION_BODIES),
        (LINKS_TABLE, CREATE_LINKS),
    ]
}
