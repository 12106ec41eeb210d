use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use daybook_core::time::{local_now, parse_day, parse_local_datetime};
use daybook_core::{DayKey, day_key};
use std::path::PathBuf;

mod config;
mod report;
mod state;
mod watch;

#[derive(Parser, Debug)]
#[command(
    name = "daybook",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("DAYBOOK_BUILD_SHA"), ")"),
    about = "Daybook: tasks, recurrences and mood analytics"
)]
struct Cli {
    /// Snapshot of tasks and mood entries (default: ~/.daybook/snapshot.json)
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tasks and wellbeing for one day
    Agenda {
        /// Day to show, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Mood series and per-category completion
    Analytics {
        /// Window length in days (default from config.analytics.window_days)
        #[arg(long)]
        days: Option<usize>,

        /// Last day of the window, YYYY-MM-DD (default: today)
        #[arg(long)]
        end: Option<String>,
    },

    /// Next incomplete tasks
    Upcoming {
        #[arg(long)]
        limit: Option<usize>,

        /// Look ahead from this local time, "YYYY-MM-DD HH:MM" (default: now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Poll for due reminders until interrupted
    Watch,

    /// Config file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.daybook/config.toml with defaults
    Init,
    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let snapshot = cli.snapshot;

    match cli.command {
        Command::Agenda { date } => {
            let session = Session::open(snapshot)?;
            let day = resolve_day(date.as_deref(), session.today())?;
            let loaded = state::read_snapshot(&session.snapshot)?;
            print!("{}", report::render_agenda(&loaded.book, &loaded.moods, day));
        }

        Command::Analytics { days, end } => {
            let session = Session::open(snapshot)?;
            let end = resolve_day(end.as_deref(), session.today())?;
            let window = days.unwrap_or(session.cfg.analytics.window_days);
            let loaded = state::read_snapshot(&session.snapshot)?;
            print!("{}", report::render_analytics(&loaded.book, &loaded.moods, window, end));
        }

        Command::Upcoming { limit, at } => {
            let session = Session::open(snapshot)?;
            let limit = limit.unwrap_or(session.cfg.analytics.upcoming_limit);
            let from = match at {
                Some(s) => parse_local_datetime(&s).context("--at")?,
                None => session.now,
            };
            let loaded = state::read_snapshot(&session.snapshot)?;
            print!("{}", report::render_upcoming(&loaded.book, from, limit));
        }

        Command::Watch => {
            let session = Session::open(snapshot)?;
            watch::run(&session.cfg, &session.snapshot).await?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

/// Config, local "now" and snapshot location for one invocation.
struct Session {
    cfg: config::Config,
    now: NaiveDateTime,
    snapshot: PathBuf,
}

impl Session {
    fn open(snapshot: Option<PathBuf>) -> Result<Self> {
        let cfg = config::load_config()?;
        let now = local_now(cfg.tz()?, Utc::now());
        let snapshot = match snapshot {
            Some(p) => p,
            None => state::default_snapshot_path()?,
        };
        Ok(Self { cfg, now, snapshot })
    }

    fn today(&self) -> DayKey {
        day_key(&self.now)
    }
}

fn resolve_day(arg: Option<&str>, today: DayKey) -> Result<DayKey> {
    match arg {
        Some(s) => parse_day(s).context("--date/--end"),
        None => Ok(today),
    }
}
