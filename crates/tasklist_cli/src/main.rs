//! Command-line front end for the task list.
//!
//! # Responsibility
//! - Stand in for a presentation layer: parse one command, apply it, print
//!   the resulting list.
//! - Keep all state handling inside `tasklist_core`.

use clap::{Parser, Subcommand};
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;
use tasklist_core::storage::open_db;
use tasklist_core::{
    init_logging, DisabledSeedLoader, HttpSeedLoader, IdGenerator, LogLevel, LoggingConfig,
    SeedConfig, SeedLoader, SqliteKeyValueStore, StoreResult, TaskStore, UuidIdGenerator,
};

const DEFAULT_DB_FILE_NAME: &str = "tasklist.sqlite3";

#[derive(Debug, Parser)]
#[command(name = "tasklist", version, about = "Ordered, persisted to-do list")]
struct Cli {
    /// SQLite database file holding the list.
    #[arg(long, default_value = DEFAULT_DB_FILE_NAME)]
    db: PathBuf,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long)]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<LogLevel>,

    /// Remote feed used to seed an empty list.
    #[arg(long)]
    seed_url: Option<String>,

    /// Never contact the seed feed.
    #[arg(long)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the list (default).
    List,
    /// Add a task at the top of the list.
    Add { title: String },
    /// Remove a task.
    Remove { id: String },
    /// Flip a task between done and not done.
    Toggle { id: String },
    /// Move a task one position up.
    Up { id: String },
    /// Move a task one position down.
    Down { id: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.unwrap_or_else(LogLevel::for_build);
        if let Err(err) = LoggingConfig::new(level, log_dir).and_then(|c| init_logging(&c)) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_command module=cli status=error error={message}");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let conn = open_db(&cli.db)
        .map_err(|err| format!("cannot open `{}`: {err}", cli.db.display()))?;
    let storage = SqliteKeyValueStore::new(&conn);

    let seed: Box<dyn SeedLoader> = if cli.offline {
        Box::new(DisabledSeedLoader)
    } else {
        let config = cli
            .seed_url
            .as_deref()
            .map_or_else(SeedConfig::default, SeedConfig::with_endpoint);
        Box::new(HttpSeedLoader::new(config))
    };

    let mut store = TaskStore::initialize(storage, UuidIdGenerator, seed.as_ref())
        .map_err(|err| err.to_string())?;

    let command = cli.command.as_ref().unwrap_or(&Command::List);
    apply(&mut store, command).map_err(|err| err.to_string())?;
    print_list(&store);
    Ok(())
}

fn apply<G: IdGenerator>(
    store: &mut TaskStore<SqliteKeyValueStore<'_>, G>,
    command: &Command,
) -> StoreResult<()> {
    match command {
        Command::List => Ok(()),
        Command::Add { title } => store.add(title).map(|_| ()),
        Command::Remove { id } => store.remove(id),
        Command::Toggle { id } => store.toggle_completed(id),
        Command::Up { id } => store.move_up(id),
        Command::Down { id } => store.move_down(id),
    }
}

fn print_list<G: IdGenerator>(store: &TaskStore<SqliteKeyValueStore<'_>, G>) {
    let tasks = store.list();
    if tasks.is_empty() {
        println!("(no tasks)");
        return;
    }
    for task in &tasks {
        let mark = if task.completed { 'x' } else { ' ' };
        println!("[{mark}] {} {}", task.id, task.title);
    }
    println!("{}/{} done", store.completed_count(), store.len());
}
