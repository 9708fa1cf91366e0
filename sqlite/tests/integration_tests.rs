//! Integration tests for the quiz-store-sqlite crate.

use quiz_store_core::{NewQuestion, Question, QuizOption, ValidationError};
use quiz_store_sqlite::{
    ErrorKind, Migration, QuestionStore, StoreError, example_question, open_store,
};
use rusqlite::{Connection, params};

/// Creates an in-memory connection with tables already created.
fn setup_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    let mut migration = Migration::new(conn).unwrap();
    migration.up().unwrap();
    migration.into_connection()
}

fn count(conn: &Connection, sql: &str, id: i64) -> i64 {
    conn.query_row(sql, params![id], |row| row.get(0)).unwrap()
}

fn total(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

fn links_for(conn: &Connection, question_id: i64) -> i64 {
    count(
        conn,
        "SELECT COUNT(*) FROM questions WHERE question_id = ?1",
        question_id,
    )
}

fn linked_options_for(conn: &Connection, question_id: i64) -> i64 {
    count(
        conn,
        "SELECT COUNT(*) FROM options o JOIN questions q ON q.option_id = o.id \
         WHERE q.question_id = ?1",
        question_id,
    )
}

/// Makes every insert of an option with body `poison` fail.
fn install_poison_trigger(conn: &Connection) {
    conn.execute_batch(
        "CREATE TRIGGER fail_poison_option BEFORE INSERT ON options \
         WHEN NEW.body = 'poison' \
         BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
    )
    .unwrap();
}

fn bodies(question: &Question) -> Vec<(&str, bool)> {
    question
        .options
        .iter()
        .map(|o| (o.body.as_str(), o.correct))
        .collect()
}

// =============================================================================
// Round trip and ordering
// =============================================================================

#[test]
fn test_round_trip() {
    let conn = setup_conn();
    let store = QuestionStore::new(&conn).unwrap();

    let input = NewQuestion::new("Capital of France?")
        .with_option("Paris", true)
        .with_option("Lyon", false);
    let id = store.create_question(&input).unwrap();

    let loaded = store.read_question(id).unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.body, "Capital of France?");
    assert_eq!(bodies(&loaded), vec![("Paris", true), ("Lyon", false)]);

    let ids = loaded.option_ids();
    assert!(ids.iter().all(|id| *id > 0));
    assert_ne!(ids[0], ids[1]);
}

#[test]
fn test_order_preserved() {
    let conn = setup_conn();
    let store = QuestionStore::new(&conn).unwrap();

    let id = store
        .create_question(
            &NewQuestion::new("a")
                .with_option("b", true)
                .with_option("c", false)
                .with_option("d", true),
        )
        .unwrap();

    let loaded = store.read_question(id).unwrap();
    assert_eq!(
        bodies(&loaded),
        vec![("b", true), ("c", false), ("d", true)]
    );
}

#[test]
fn test_order_comes_from_link_rows_not_ids() {
    let conn = setup_conn();
    let store = QuestionStore::new(&conn).unwrap();
    let id = store
        .create_question(
            &NewQuestion::new("a")
                .with_option("first", true)
                .with_option("second", false),
        )
        .unwrap();

    // Swap positions directly in the link table.
    conn.execute(
        "UPDATE questions SET option_order = 1 - option_order WHERE question_id = ?1",
        params![id],
    )
    .unwrap();

    let loaded = store.read_question(id).unwrap();
    assert_eq!(bodies(&loaded), vec![("second", false), ("first", true)]);
}

#[test]
fn test_round_trip_blank_bodies() {
    let conn = setup_conn();
    let store = QuestionStore::new(&conn).unwrap();

    let input = NewQuestion::new("")
        .with_option("", true)
        .with_option(" ", false);
    let id = store.create_question(&input).unwrap();

    let loaded = store.read_question(id).unwrap();
    assert_eq!(loaded.body, "");
    assert_eq!(bodies(&loaded), vec![("", true), (" ", false)]);
    assert_eq!(NewQuestion::from(&loaded), input);

    let mut edited = loaded.clone();
    edited.body = "   ".into();
    edited.options[0].body = String::new();
    store.update_question(&edited).unwrap();
    assert_eq!(store.read_question(id).unwrap().body, "   ");
}

#[test]
fn test_read_missing_question() {
    let conn = setup_conn();
    let store = QuestionStore::new(&conn).unwrap();

    let err = store.read_question(99).unwrap_err();
    assert!(matches!(err, StoreError::QuestionNotFound(99)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_dangling_link_is_persistence_error() {
    let conn = setup_conn();
    let id = {
        let store = QuestionStore::new(&conn).unwrap();
        store
            .create_question(&NewQuestion::new("a").with_option("b", true))
            .unwrap()
    };

    conn.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();
    conn.execute("DELETE FROM options", []).unwrap();

    let store = QuestionStore::new(&conn).unwrap();
    let err = store.read_question(id).unwrap_err();
    assert!(matches!(err, StoreError::DanglingLink { question_id, .. } if question_id == id));
    assert_eq!(err.kind(), ErrorKind::Persistence);
    assert!(store.read_all_questions().is_err());
}

// =============================================================================
// Listing
// =============================================================================

#[test]
fn test_list_returns_every_question() {
    let conn = setup_conn();
    let store = QuestionStore::new(&conn).unwrap();

    let inputs: Vec<NewQuestion> = (0..5)
        .map(|n| {
            (0..n).fold(NewQuestion::new(format!("question {n}")), |q, i| {
                q.with_option(format!("option {i}"), i % 2 == 0)
            })
        })
        .collect();
    let ids: Vec<i64> = inputs
        .iter()
        .map(|q| store.create_question(q).unwrap())
        .collect();

    let all = store.read_all_questions().unwrap();
    assert_eq!(all.len(), 5);
    for ((question, input), id) in all.iter().zip(&inputs).zip(&ids) {
        assert_eq!(question.id, *id);
        assert_eq!(&NewQuestion::from(question), input);
        assert_eq!(question, &store.read_question(*id).unwrap());
    }
}

#[test]
fn test_list_empty_store() {
    let conn = setup_conn();
    let store = QuestionStore::new(&conn).unwrap();
    assert!(store.read_all_questions().unwrap().is_empty());
}

// =============================================================================
// Update
// =============================================================================

#[test]
fn test_update_replaces_all_rows() {
    let conn = setup_conn();
    let store = QuestionStore::new(&conn).unwrap();
    let id = store
        .create_question(
            &NewQuestion::new("a")
                .with_option("b", true)
                .with_option("c", false)
                .with_option("d", true),
        )
        .unwrap();

    let mut question = store.read_question(id).unwrap();
    let old_ids = question.option_ids();
    question.body = "a, edited".into();
    question.options.pop();
    question.options[1].correct = true;

    store.update_question(&question).unwrap();

    assert_eq!(links_for(&conn, id), 2);
    assert_eq!(linked_options_for(&conn, id), 2);
    assert_eq!(total(&conn, "options"), 2);
    assert_eq!(total(&conn, "questions"), 2);

    let loaded = store.read_question(id).unwrap();
    assert_eq!(loaded.body, "a, edited");
    assert_eq!(bodies(&loaded), vec![("b", true), ("c", true)]);
    // Option identities always change across an update.
    assert!(loaded.option_ids().iter().all(|new| !old_ids.contains(new)));
}

#[test]
fn test_update_with_unchanged_content_churns_ids() {
    let conn = setup_conn();
    let store = QuestionStore::new(&conn).unwrap();
    let id = store
        .create_question(&NewQuestion::new("a").with_option("b", true))
        .unwrap();

    let before = store.read_question(id).unwrap();
    store.update_question(&before).unwrap();
    let after = store.read_question(id).unwrap();

    assert_eq!(bodies(&before), bodies(&after));
    assert_ne!(before.option_ids(), after.option_ids());
}

#[test]
fn test_update_can_add_new_options() {
    let conn = setup_conn();
    let store = QuestionStore::new(&conn).unwrap();
    let id = store
        .create_question(&NewQuestion::new("a").with_option("b", true))
        .unwrap();

    let mut question = store.read_question(id).unwrap();
    question.options.insert(0, QuizOption::new(0, "new first", false));
    store.update_question(&question).unwrap();

    let loaded = store.read_question(id).unwrap();
    assert_eq!(bodies(&loaded), vec![("new first", false), ("b", true)]);
    assert_eq!(total(&conn, "options"), 2);
}

#[test]
fn test_update_missing_question() {
    let conn = setup_conn();
    let store = QuestionStore::new(&conn).unwrap();

    let mut ghost = Question::new(41, "ghost");
    ghost.options.push(QuizOption::new(0, "b", true));

    let err = store.update_question(&ghost).unwrap_err();
    assert!(matches!(err, StoreError::QuestionNotFound(41)));
    assert_eq!(total(&conn, "options"), 0);
    assert_eq!(total(&conn, "questions"), 0);
}

#[test]
fn test_update_rejects_option_of_other_question() {
    let conn = setup_conn();
    let store = QuestionStore::new(&conn).unwrap();
    let first = store
        .create_question(&NewQuestion::new("first").with_option("b", true))
        .unwrap();
    let second = store
        .create_question(&NewQuestion::new("second").with_option("x", false))
        .unwrap();

    let before_first = store.read_question(first).unwrap();
    let before_second = store.read_question(second).unwrap();

    let mut tampered = before_first.clone();
    tampered.body = "changed".into();
    tampered.options.push(before_second.options[0].clone());

    let err = store.update_question(&tampered).unwrap_err();
    assert!(matches!(
        err,
        StoreError::ValidationError(ValidationError::ForeignOption { .. })
    ));
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert_eq!(store.read_question(first).unwrap(), before_first);
    assert_eq!(store.read_question(second).unwrap(), before_second);
}

#[test]
fn test_failed_update_keeps_previous_version() {
    let conn = setup_conn();
    let store = QuestionStore::new(&conn).unwrap();
    let id = store
        .create_question(
            &NewQuestion::new("a")
                .with_option("b", true)
                .with_option("c", false),
        )
        .unwrap();
    let before = store.read_question(id).unwrap();
    install_poison_trigger(&conn);

    let mut question = before.clone();
    question.body = "edited".into();
    question.options[1].body = "poison".into();

    let err = store.update_question(&question).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Persistence);
    assert_eq!(store.read_question(id).unwrap(), before);
    assert!(conn.is_autocommit());
}

// =============================================================================
// Delete
// =============================================================================

#[test]
fn test_delete_removes_every_row() {
    let conn = setup_conn();
    let store = QuestionStore::new(&conn).unwrap();
    let doomed = store
        .create_question(
            &NewQuestion::new("a")
                .with_option("b", true)
                .with_option("c", false),
        )
        .unwrap();
    let kept = store
        .create_question(&NewQuestion::new("keep").with_option("k", true))
        .unwrap();

    let question = store.read_question(doomed).unwrap();
    store.delete_question(&question).unwrap();

    assert!(matches!(
        store.read_question(doomed),
        Err(StoreError::QuestionNotFound(id)) if id == doomed
    ));
    assert_eq!(links_for(&conn, doomed), 0);
    for option_id in question.option_ids() {
        assert_eq!(
            count(&conn, "SELECT COUNT(*) FROM options WHERE id = ?1", option_id),
            0
        );
        assert_eq!(
            count(&conn, "SELECT COUNT(*) FROM questions WHERE option_id = ?1", option_id),
            0
        );
    }

    let survivor = store.read_question(kept).unwrap();
    assert_eq!(bodies(&survivor), vec![("k", true)]);
    assert_eq!(total(&conn, "options"), 1);
}

#[test]
fn test_delete_by_id() {
    let conn = setup_conn();
    let store = QuestionStore::new(&conn).unwrap();
    let id = store
        .create_question(&NewQuestion::new("a").with_option("b", true))
        .unwrap();

    let removed = store.delete_question_by_id(id).unwrap();
    assert_eq!(removed.body, "a");
    assert_eq!(total(&conn, "question_bodies"), 0);
    assert_eq!(total(&conn, "options"), 0);
    assert_eq!(total(&conn, "questions"), 0);

    assert!(matches!(
        store.delete_question_by_id(id),
        Err(StoreError::QuestionNotFound(_))
    ));
}

#[test]
fn test_delete_with_stale_options_changes_nothing() {
    let conn = setup_conn();
    let store = QuestionStore::new(&conn).unwrap();
    let id = store
        .create_question(
            &NewQuestion::new("a")
                .with_option("b", true)
                .with_option("c", false),
        )
        .unwrap();

    let stale = store.read_question(id).unwrap();
    store.update_question(&stale).unwrap();
    let current = store.read_question(id).unwrap();

    let err = store.delete_question(&stale).unwrap_err();
    assert!(matches!(
        err,
        StoreError::ValidationError(ValidationError::ForeignOption { question_id, .. })
            if question_id == id
    ));

    assert_eq!(store.read_question(id).unwrap(), current);
    assert_eq!(links_for(&conn, id), 2);
    assert_eq!(linked_options_for(&conn, id), 2);
    assert_eq!(total(&conn, "question_bodies"), 1);
}

#[test]
fn test_delete_with_option_of_other_question_changes_nothing() {
    let conn = setup_conn();
    let store = QuestionStore::new(&conn).unwrap();
    let first = store
        .create_question(&NewQuestion::new("first").with_option("b", true))
        .unwrap();
    let second = store
        .create_question(&NewQuestion::new("second").with_option("x", false))
        .unwrap();

    let mut tampered = store.read_question(first).unwrap();
    let other = store.read_question(second).unwrap();
    tampered.options.push(other.options[0].clone());

    assert!(matches!(
        store.delete_question(&tampered),
        Err(StoreError::ValidationError(ValidationError::ForeignOption { .. }))
    ));
    assert_eq!(store.read_question(second).unwrap(), other);
    assert_eq!(bodies(&store.read_question(first).unwrap()), vec![("b", true)]);
    assert_eq!(total(&conn, "options"), 2);
    assert_eq!(total(&conn, "questions"), 2);
}

#[test]
fn test_delete_missing_question() {
    let conn = setup_conn();
    let store = QuestionStore::new(&conn).unwrap();
    let err = store.delete_question(&Question::new(5, "gone")).unwrap_err();
    assert!(matches!(err, StoreError::QuestionNotFound(5)));
}

// =============================================================================
// Atomicity
// =============================================================================

#[test]
fn test_failed_create_leaves_nothing_behind() {
    let conn = setup_conn();
    install_poison_trigger(&conn);
    let store = QuestionStore::new(&conn).unwrap();

    let err = store
        .create_question(
            &NewQuestion::new("a")
                .with_option("b", true)
                .with_option("poison", false)
                .with_option("d", true),
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::DatabaseError(_)));
    assert_eq!(err.kind(), ErrorKind::Persistence);

    assert_eq!(total(&conn, "question_bodies"), 0);
    assert_eq!(total(&conn, "options"), 0);
    assert_eq!(total(&conn, "questions"), 0);
    assert!(conn.is_autocommit());

    // The connection stays usable after the rollback.
    let id = store
        .create_question(&NewQuestion::new("a").with_option("b", true))
        .unwrap();
    assert_eq!(bodies(&store.read_question(id).unwrap()), vec![("b", true)]);
}

// =============================================================================
// Bootstrap and seeding
// =============================================================================

#[test]
fn test_bootstrap_seeds_example_question() {
    let conn = Connection::open_in_memory().unwrap();
    let mut migration = Migration::new(conn).unwrap();
    assert!(migration.bootstrap(true).unwrap());
    let conn = migration.into_connection();

    let store = QuestionStore::new(&conn).unwrap();
    let all = store.read_all_questions().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].body, "a");
    assert_eq!(bodies(&all[0]), vec![("b", true), ("c", false)]);
    assert_eq!(NewQuestion::from(&all[0]), example_question());
}

#[test]
fn test_open_store_bootstraps_file_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.sqlite3");

    {
        let conn = open_store(&path, true).unwrap();
        let store = QuestionStore::new(&conn).unwrap();
        store
            .create_question(&NewQuestion::new("second").with_option("x", true))
            .unwrap();
    }

    let conn = open_store(&path, true).unwrap();
    let status = Migration::new(conn).unwrap().status().unwrap();
    assert!(status.tables_exist);
    assert_eq!(status.question_count, 2);
    assert_eq!(status.option_count, 3);
    assert_eq!(status.link_count, 3);
}

#[test]
fn test_seed_from_bank_file() {
    let dir = tempfile::tempdir().unwrap();
    let bank_path = dir.path().join("bank.json");
    std::fs::write(
        &bank_path,
        serde_json::json!({
            "version": "1.0.0",
            "questions": [
                {"body": "2 + 2?", "options": [
                    {"body": "4", "correct": true},
                    {"body": "5", "correct": false}
                ]},
                {"body": "Sky colour?", "options": [{"body": "blue", "correct": true}]}
            ]
        })
        .to_string(),
    )
    .unwrap();

    let conn = Connection::open_in_memory().unwrap();
    let mut migration = Migration::new(conn).unwrap();
    migration.up().unwrap();
    let report = migration.seed_from(&bank_path).unwrap();
    assert_eq!(report.questions_inserted, 2);
    assert_eq!(report.options_inserted, 3);

    let conn = migration.into_connection();
    let store = QuestionStore::new(&conn).unwrap();
    let math = store.read_question(report.question_ids[0]).unwrap();
    assert_eq!(bodies(&math), vec![("4", true), ("5", false)]);
}

#[test]
fn test_seed_from_missing_file_is_persistence_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut migration = Migration::new(setup_conn()).unwrap();

    let err = migration.seed_from(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, StoreError::LoaderError(_)));
    assert_eq!(err.kind(), ErrorKind::Persistence);
}

#[test]
fn test_seed_from_malformed_file_is_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    let mut migration = Migration::new(setup_conn()).unwrap();

    let err = migration.seed_from(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(migration.status().unwrap().question_count, 0);
}

#[test]
fn test_seed_is_atomic() {
    let conn = setup_conn();
    install_poison_trigger(&conn);
    let mut migration = Migration::new(conn).unwrap();

    let mut bank = quiz_store_core::QuestionBank::new("1.0.0");
    bank.questions.push(NewQuestion::new("ok").with_option("b", true));
    bank.questions.push(NewQuestion::new("bad").with_option("poison", true));

    assert!(migration.seed(&bank).is_err());
    let status = migration.status().unwrap();
    assert_eq!(status.question_count, 0);
    assert_eq!(status.option_count, 0);
}
