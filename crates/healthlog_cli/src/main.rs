//! `healthlog` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration from flags and `HEALTHLOG_*` environment variables.
//! - Open one store per invocation and hand it to core services.
//! - Map failures to a one-line message and a non-zero exit code.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use healthlog_core::db::{open_db, DbError};
use healthlog_core::service::local_today;
use healthlog_core::{
    default_log_level, init_logging, init_stderr_logging, seed_if_empty, seed_sample_data,
    CorrelationService, HealthStore, MetricKind, MissingRecordPolicy, QueryService, RecordId,
    RecordRepository, RepoError, SameDayPolicy, TrendEntry,
};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_DB_FILE: &str = "healthlog.sqlite3";
const DEFAULT_WINDOW_DAYS: &str = "30";

#[derive(Parser)]
#[command(name = "healthlog")]
#[command(about = "Personal health log with trend correlation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite database file (defaults to the system temp directory)
    #[arg(long, env = "HEALTHLOG_DB_PATH", global = true)]
    db_path: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, env = "HEALTHLOG_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logs go to stderr when unset
    #[arg(long, env = "HEALTHLOG_LOG_DIR", global = true)]
    log_dir: Option<String>,

    /// Treat updates of missing records as no-ops instead of errors
    #[arg(long, global = true)]
    lenient: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a month of sample data
    Seed {
        /// Only seed when every collection is empty
        #[arg(long)]
        if_empty: bool,
    },

    /// Record one metric sample
    AddTrend {
        /// Metric: sleep, sodium, meds, pain, energy, hydration, bp or hr
        kind: MetricKind,
        value: f64,

        /// Calendar day (YYYY-MM-DD), today when omitted
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        note: Option<String>,
    },

    /// List samples of one metric in a trailing window
    Trends {
        kind: MetricKind,

        #[arg(long, default_value = DEFAULT_WINDOW_DAYS)]
        days: i64,
    },

    /// Correlate two metrics on shared days
    Correlate {
        metric_a: MetricKind,
        metric_b: MetricKind,

        #[arg(long, default_value = DEFAULT_WINDOW_DAYS)]
        days: i64,

        /// Average same-day samples instead of keeping the last one
        #[arg(long)]
        mean: bool,
    },

    /// List unresolved vital alerts
    Alerts,

    /// Mark a vital alert resolved
    ResolveAlert {
        id: String,

        /// What was done about it
        action: String,
    },

    /// Show record counts per collection
    Summary,
}

#[derive(Debug)]
enum CliError {
    Logging(String),
    Db(DbError),
    Repo(RepoError),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(message) => write!(f, "logging setup failed: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(_) => None,
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_exit module=cli status=error");
            eprintln!("healthlog: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    match cli.log_dir.as_deref() {
        Some(dir) => init_logging(&level, dir),
        None => init_stderr_logging(&level),
    }
    .map_err(CliError::Logging)?;

    let db_path = cli
        .db_path
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE));
    let policy = if cli.lenient {
        MissingRecordPolicy::Lenient
    } else {
        MissingRecordPolicy::Strict
    };

    let conn = open_db(&db_path)?;
    let store = HealthStore::try_new(&conn, policy)?;
    info!("event=cli_start module=cli status=ok policy={:?}", policy);

    execute(cli.command, &store)
}

fn execute(command: Commands, store: &HealthStore<'_>) -> Result<(), CliError> {
    let query = QueryService::new(store);
    let today = local_today();

    match command {
        Commands::Seed { if_empty } => {
            let mut rng = rand::thread_rng();
            let report = if if_empty {
                seed_if_empty(store, today, &mut rng)?
            } else {
                Some(seed_sample_data(store, today, &mut rng)?)
            };
            match report {
                Some(report) => println!(
                    "seeded {} trends, {} triggers, {} good days, {} allergies",
                    report.trends, report.triggers, report.good_days, report.allergies
                ),
                None => println!("store already has data; nothing seeded"),
            }
        }
        Commands::AddTrend {
            kind,
            value,
            date,
            note,
        } => {
            let mut entry = TrendEntry::new(date.unwrap_or(today), kind, value);
            entry.note = note;
            let id = store.trends.add(&entry)?;
            println!("{id}");
        }
        Commands::Trends { kind, days } => {
            for sample in query.trends_by_type_as_of(kind, days, today)? {
                match sample.note.as_deref() {
                    Some(note) => println!("{}  {:>8.2}  {}", sample.date, sample.value, note),
                    None => println!("{}  {:>8.2}", sample.date, sample.value),
                }
            }
        }
        Commands::Correlate {
            metric_a,
            metric_b,
            days,
            mean,
        } => {
            let policy = if mean {
                SameDayPolicy::Mean
            } else {
                SameDayPolicy::LastWritten
            };
            let correlation = CorrelationService::with_policy(query, policy)
                .correlate_as_of(metric_a, metric_b, days, today)?;
            println!(
                "{metric_a} vs {metric_b} over {days} days: r = {:.3} ({}), {} shared days",
                correlation.coefficient,
                correlation.describe(),
                correlation.points.len()
            );
        }
        Commands::Alerts => {
            for alert in query.unresolved_vital_alerts()? {
                println!(
                    "{}  {}  {}  value={} threshold={}  {}",
                    alert.id, alert.date, alert.kind, alert.value, alert.threshold, alert.severity
                );
            }
        }
        Commands::ResolveAlert { id, action } => {
            query.resolve_alert(&RecordId::from(id), &action)?;
            println!("resolved");
        }
        Commands::Summary => {
            let counts = store.counts()?;
            println!("trends            {}", counts.trends);
            println!("er visits         {}", counts.er_visits);
            println!("med effects       {}", counts.med_effects);
            println!("appointments      {}", counts.appointments);
            println!("triggers          {}", counts.triggers);
            println!("good days         {}", counts.good_days);
            println!("vital alerts      {}", counts.vital_alerts);
            println!("doctor protocols  {}", counts.doctor_protocols);
            println!("allergies         {}", counts.allergies);
            println!("total             {}", counts.total());
        }
    }
    Ok(())
}
