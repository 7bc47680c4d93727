use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use taskboard_core::db::open_db;
use taskboard_core::{
    default_log_level, init_logging, BoardSession, CrossBoardPolicy, Frequency, LoggingConfig,
    SessionOptions, SqliteKeyValueStore,
};

mod cmd;
mod render;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(version, about = "Kanban boards, cards and habits in a local SQLite file")]
pub struct Cli {
    /// Board database file
    #[arg(long, global = true, env = "TASKBOARD_DB", default_value = "taskboard.db")]
    pub db: PathBuf,

    /// Directory for rolling log files (defaults to `logs/` next to the database)
    #[arg(long, global = true, env = "TASKBOARD_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "TASKBOARD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Renumber both boards when a card moves between boards
    #[arg(long, global = true)]
    pub renumber_cross_board: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create, edit or delete boards
    Board {
        #[command(subcommand)]
        command: BoardCommands,
    },
    /// Create, edit, complete or delete cards
    Card {
        #[command(subcommand)]
        command: CardCommands,
    },
    /// Drop a card or board onto another card or board
    Move {
        /// Id of the dragged card or board
        dragged: String,
        /// Id of the card or board it is dropped on; omit to cancel
        target: Option<String>,
    },
    /// Render the boards
    View {
        #[command(subcommand)]
        command: ViewCommands,
    },
}

#[derive(Subcommand)]
pub enum BoardCommands {
    Add {
        title: String,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        order: Option<i64>,
    },
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "clear_color")]
        color: Option<String>,
        #[arg(long)]
        clear_color: bool,
        #[arg(long)]
        order: Option<i64>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum CardCommands {
    Add {
        /// Owning board id
        board: String,
        content: String,
        #[arg(long)]
        description: Option<String>,
        /// Due date as YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        due: Option<NaiveDate>,
        #[arg(long, value_enum)]
        frequency: Option<FrequencyArg>,
        /// Repeatable
        #[arg(long = "label")]
        labels: Vec<String>,
        #[arg(long)]
        order: Option<i64>,
    },
    Edit {
        id: String,
        #[arg(long)]
        content: Option<String>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long)]
        clear_description: bool,
        #[arg(long, value_parser = parse_date, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,
        #[arg(long)]
        clear_due: bool,
        #[arg(long, value_enum, conflicts_with = "clear_frequency")]
        frequency: Option<FrequencyArg>,
        #[arg(long)]
        clear_frequency: bool,
        /// Replaces all labels; repeatable
        #[arg(long = "label", conflicts_with = "clear_labels")]
        labels: Vec<String>,
        #[arg(long)]
        clear_labels: bool,
        /// Move to another board id
        #[arg(long)]
        board: Option<String>,
        #[arg(long)]
        order: Option<i64>,
    },
    /// Mark a card completed
    Done {
        id: String,
    },
    /// Mark a card not completed
    Undo {
        id: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ViewCommands {
    /// Kanban columns
    Board,
    /// Cards grouped by board
    List {
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
        #[arg(long)]
        desc: bool,
    },
    /// Month grid of due cards
    Calendar {
        /// YYYY-MM, defaults to the current month
        #[arg(long, value_parser = parse_month)]
        month: Option<(i32, u32)>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Daily,
    Weekly,
    Monthly,
}

impl From<FrequencyArg> for Frequency {
    fn from(value: FrequencyArg) -> Self {
        match value {
            FrequencyArg::Daily => Frequency::Daily,
            FrequencyArg::Weekly => Frequency::Weekly,
            FrequencyArg::Monthly => Frequency::Monthly,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortArg {
    Content,
    Due,
    Created,
    Updated,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

fn parse_month(value: &str) -> Result<(i32, u32), String> {
    use chrono::Datelike;
    let first = NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM: {err}"))?;
    Ok((first.year(), first.month()))
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        log::error!("event=cli_command module=cli status=error error={err:#}");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    start_logging(cli);

    let conn = open_db(&cli.db)
        .with_context(|| format!("Failed to open board database {}", cli.db.display()))?;
    let store = SqliteKeyValueStore::try_new(&conn).context("Board database is not initialized")?;
    let options = SessionOptions {
        cross_board: if cli.renumber_cross_board {
            CrossBoardPolicy::Renumber
        } else {
            CrossBoardPolicy::PreserveSiblings
        },
    };
    let mut session = BoardSession::open(store, options).context("Failed to load boards")?;

    match &cli.command {
        Commands::Board { command } => cmd::cmd_board(&mut session, command)?,
        Commands::Card { command } => cmd::cmd_card(&mut session, command)?,
        Commands::Move { dragged, target } => {
            cmd::cmd_move(&mut session, dragged, target.as_deref())?
        }
        Commands::View { command } => cmd::cmd_view(&session, command)?,
    }
    Ok(())
}

/// File logging is best effort; the command still runs without it.
fn start_logging(cli: &Cli) {
    if let Err(err) = init_logging(&logging_config(cli)) {
        eprintln!("warning: logging disabled: {err}");
    }
}

/// Logs go to files only; `main` reports failures on stderr itself.
fn logging_config(cli: &Cli) -> LoggingConfig {
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    let log_dir = match cli.log_dir.clone() {
        Some(dir) => absolute(&dir),
        None => absolute(&cli.db)
            .parent()
            .map(|parent| parent.join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs")),
    };

    LoggingConfig::new(level, log_dir)
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::{logging_config, Cli};
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn logging_stays_off_stderr_and_defaults_next_to_db() {
        let cli = Cli::try_parse_from([
            "taskboard",
            "--db",
            "/tmp/boards/taskboard.db",
            "--log-level",
            "warn",
            "view",
            "board",
        ])
        .unwrap();
        let config = logging_config(&cli);

        assert!(!config.echo_stderr);
        assert_eq!(config.level, "warn");
        assert_eq!(config.log_dir, Path::new("/tmp/boards/logs"));
    }

    #[test]
    fn explicit_log_dir_wins() {
        let cli = Cli::try_parse_from([
            "taskboard",
            "--log-dir",
            "/var/log/taskboard",
            "--log-level",
            "info",
            "move",
            "a",
        ])
        .unwrap();
        assert_eq!(logging_config(&cli).log_dir, Path::new("/var/log/taskboard"));
    }
}
