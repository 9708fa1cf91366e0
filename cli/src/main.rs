use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use quiz_store_core::{
    NewQuestion, Question, ValidationError, parse_id, validate_new_question, validate_question,
};
use quiz_store_db::StoreConfig;
use quiz_store_sqlite::{Migration, MigrationStatus, QuestionStore, open_store};
use rusqlite::{Connection, OpenFlags};
use tracing::debug;

const LOG_ENV: &str = "QUIZ_STORE_LOG";

#[derive(Debug, Parser)]
#[command(name = "quiz-store")]
#[command(about = "Manage quiz questions stored in SQLite")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./quiz-store.yml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Database file path, overriding the configuration.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Enable debug logging.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the quiz tables, seeding the example question.
    Init(InitArgs),
    /// Show whether the tables exist and how many rows they hold.
    Status,
    /// Insert every question of a bank file or directory.
    Seed(SeedArgs),
    /// Export all stored questions as a JSON bank.
    Export(ExportArgs),
    /// Create a question from NewQuestion JSON and print its id.
    Add(InputArgs),
    /// Print one question as JSON.
    Get(IdArgs),
    /// Print every question as JSON.
    List,
    /// Replace a question from Question JSON.
    Update(InputArgs),
    /// Delete a question with its options.
    Delete(IdArgs),
}

#[derive(Debug, Args)]
struct InitArgs {
    /// Create empty tables without the example question.
    #[arg(long)]
    no_seed: bool,
}

#[derive(Debug, Args)]
struct SeedArgs {
    /// Bank file (.json, .yaml, .yml) or directory of bank files.
    source: PathBuf,
}

#[derive(Debug, Args)]
struct ExportArgs {
    /// Output file (stdout when omitted).
    #[arg(long)]
    output: Option<PathBuf>,
    /// Version recorded in the exported bank.
    #[arg(long, default_value = "1.0.0")]
    bank_version: String,
}

#[derive(Debug, Args)]
struct InputArgs {
    /// JSON input file (stdin when omitted).
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct IdArgs {
    /// Question id.
    id: String,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = init_tracing(cli.quiet, cli.verbose) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    let result = resolve_config(cli.config.as_deref(), cli.db).and_then(|config| {
        match cli.command {
            Command::Init(args) => run_init(&config, args),
            Command::Status => run_status(&config),
            Command::Seed(args) => run_seed(&config, args),
            Command::Export(args) => run_export(&config, args),
            Command::Add(args) => run_add(&config, args),
            Command::Get(args) => run_get(&config, args),
            Command::List => run_list(&config),
            Command::Update(args) => run_update(&config, args),
            Command::Delete(args) => run_delete(&config, args),
        }
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<(), String> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| format!("Failed to initialize logging: {e}"))
}

fn resolve_config(path: Option<&Path>, db: Option<PathBuf>) -> Result<StoreConfig, String> {
    let config = StoreConfig::resolve(path)
        .map_err(|e| format!("Failed to load configuration: {e}"))?
        .with_database_override(db);
    debug!(
        database = %config.database.display(),
        seed_example = config.seed_example,
        "Resolved configuration"
    );
    Ok(config)
}

// ---------------------------------------------------------------------------
// schema commands
// ---------------------------------------------------------------------------

fn run_init(config: &StoreConfig, args: InitArgs) -> Result<(), String> {
    let mut migration = open_migration(&config.database)?;
    let created = migration
        .bootstrap(!args.no_seed)
        .map_err(|e| format!("Initialization failed: {e}"))?;
    if !created {
        return Err(format!(
            "Store '{}' is already initialized",
            config.database.display()
        ));
    }
    println!(
        "Initialized quiz store in '{}'{}.",
        config.database.display(),
        if args.no_seed {
            ""
        } else {
            " with the example question"
        }
    );
    Ok(())
}

fn run_status(config: &StoreConfig) -> Result<(), String> {
    let status = if config.database.exists() {
        let conn =
            Connection::open_with_flags(&config.database, OpenFlags::SQLITE_OPEN_READ_ONLY)
                .map_err(|e| {
                    format!(
                        "Failed to open database '{}': {e}",
                        config.database.display()
                    )
                })?;
        Migration::new(conn)
            .and_then(|migration| migration.status())
            .map_err(|e| format!("Failed to get store status: {e}"))?
    } else {
        MigrationStatus::default()
    };
    println!("Store Status:");
    println!("  Database: {}", config.database.display());
    println!(
        "  Tables exist: {}",
        if status.tables_exist { "yes" } else { "no" }
    );
    println!("  Question count: {}", status.question_count);
    println!("  Option count: {}", status.option_count);
    println!("  Link count: {}", status.link_count);
    Ok(())
}

fn run_seed(config: &StoreConfig, args: SeedArgs) -> Result<(), String> {
    let conn = open_conn(config)?;
    let mut migration =
        Migration::new(conn).map_err(|e| format!("Failed to prepare store: {e}"))?;
    let report = migration
        .seed_from(&args.source)
        .map_err(|e| format!("Seed failed: {e}"))?;
    println!("Seed complete:");
    println!("  Questions inserted: {}", report.questions_inserted);
    println!("  Options inserted: {}", report.options_inserted);
    Ok(())
}

fn run_export(config: &StoreConfig, args: ExportArgs) -> Result<(), String> {
    let conn = open_conn(config)?;
    let store = question_store(&conn)?;
    let bank = store
        .export_bank(args.bank_version)
        .map_err(|e| format!("Export failed: {e}"))?;

    match args.output {
        Some(path) => {
            quiz_store_db::write_bank(&path, &bank)
                .map_err(|e| format!("Failed to write '{}': {e}", path.display()))?;
            println!(
                "Exported {} question(s) to '{}'.",
                bank.question_count(),
                path.display()
            );
        }
        None => print_json(&bank)?,
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// question commands
// ---------------------------------------------------------------------------

fn run_add(config: &StoreConfig, args: InputArgs) -> Result<(), String> {
    let raw = read_input(args.input.as_deref())?;
    let question: NewQuestion =
        serde_json::from_str(&raw).map_err(|e| format!("Invalid question JSON: {e}"))?;
    reject_invalid(validate_new_question(&question))?;

    let conn = open_conn(config)?;
    let id = question_store(&conn)?
        .create_question(&question)
        .map_err(|e| format!("Failed to create question: {e}"))?;
    println!("{id}");
    Ok(())
}

fn run_get(config: &StoreConfig, args: IdArgs) -> Result<(), String> {
    let id = parse_id(&args.id).map_err(|e| e.to_string())?;
    let conn = open_conn(config)?;
    let question = question_store(&conn)?
        .read_question(id)
        .map_err(|e| format!("Failed to read question: {e}"))?;
    print_json(&question)
}

fn run_list(config: &StoreConfig) -> Result<(), String> {
    let conn = open_conn(config)?;
    let questions = question_store(&conn)?
        .read_all_questions()
        .map_err(|e| format!("Failed to list questions: {e}"))?;
    print_json(&questions)
}

fn run_update(config: &StoreConfig, args: InputArgs) -> Result<(), String> {
    let raw = read_input(args.input.as_deref())?;
    let question: Question =
        serde_json::from_str(&raw).map_err(|e| format!("Invalid question JSON: {e}"))?;
    reject_invalid(validate_question(&question))?;

    let conn = open_conn(config)?;
    question_store(&conn)?
        .update_question(&question)
        .map_err(|e| format!("Failed to update question: {e}"))?;
    println!("Updated question {}.", question.id);
    Ok(())
}

fn run_delete(config: &StoreConfig, args: IdArgs) -> Result<(), String> {
    let id = parse_id(&args.id).map_err(|e| e.to_string())?;
    let conn = open_conn(config)?;
    let removed = question_store(&conn)?
        .delete_question_by_id(id)
        .map_err(|e| format!("Failed to delete question: {e}"))?;
    println!(
        "Deleted question {} with {} option(s).",
        removed.id,
        removed.options.len()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Opens the database without bootstrapping it.
fn open_migration(path: &Path) -> Result<Migration, String> {
    let conn = Connection::open(path)
        .map_err(|e| format!("Failed to open database '{}': {e}", path.display()))?;
    Migration::new(conn).map_err(|e| format!("Failed to prepare store: {e}"))
}

/// Opens the database, creating and seeding it on first use.
fn open_conn(config: &StoreConfig) -> Result<Connection, String> {
    open_store(&config.database, config.seed_example).map_err(|e| {
        format!(
            "Failed to open database '{}': {e}",
            config.database.display()
        )
    })
}

fn question_store(conn: &Connection) -> Result<QuestionStore<'_>, String> {
    QuestionStore::new(conn).map_err(|e| format!("Failed to prepare store: {e}"))
}

/// Blank bodies are accepted by the store but refused on the command line.
fn reject_invalid(errors: Vec<ValidationError>) -> Result<(), String> {
    match errors.into_iter().next() {
        Some(error) => Err(format!("Invalid question: {error}")),
        None => Ok(()),
    }
}

fn read_input(path: Option<&Path>) -> Result<String, String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("Failed to read '{}': {e}", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .map_err(|e| format!("Failed to read stdin: {e}"))?;
            Ok(raw)
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize output: {e}"))?;
    println!("{json}");
    Ok(())
}
