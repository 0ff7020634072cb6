//! drawlab — daily lottery pick generation, scoring, and reporting.
//!
//! Entry point. Loads configuration, initialises structured logging, and
//! dispatches the pipeline stages: ingest draw results, generate picks,
//! evaluate yesterday's picks, and send the digest. Every stage exits
//! cleanly on expected conditions (missing picks, missing draws) and
//! communicates the outcome via the written report plus a status line.

use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use drawlab::config::AppConfig;
use drawlab::engine::{aggregator, report};
use drawlab::ingest::{self, DrawFeed};
use drawlab::notify::{self, Notifier};
use drawlab::types::Game;
use drawlab::{picks, store};

#[derive(Parser)]
#[command(name = "drawlab", about = "Daily Powerball / Mega Millions lab")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch draw results and rewrite the canonical draw files.
    Ingest {
        /// Limit to one game (default: both).
        #[arg(long)]
        game: Option<Game>,
    },
    /// Generate the daily pick set.
    Generate {
        /// Target date (default: today, UTC).
        #[arg(long)]
        date: Option<NaiveDate>,
        /// RNG seed override for reproducible runs.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Score a day's picks against the available draws and write the report.
    Evaluate {
        /// Target date (default: yesterday, UTC).
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Send the daily digest (today's picks + yesterday's report).
    Notify,
    /// Full daily run: ingest, generate, evaluate yesterday, notify.
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    let cfg = AppConfig::load(&cli.config)?;

    init_logging();

    match cli.command {
        Command::Ingest { game } => run_ingest(&cfg, game).await?,
        Command::Generate { date, seed } => {
            let date = date.unwrap_or_else(today);
            run_generate(&cfg, date, seed)?;
        }
        Command::Evaluate { date } => {
            let date = date.unwrap_or_else(yesterday);
            let status = run_evaluate(&cfg, date)?;
            println!("[evaluate] {status}");
        }
        Command::Notify => run_notify(&cfg).await?,
        Command::Run => {
            run_ingest(&cfg, None).await?;
            run_generate(&cfg, today(), None)?;
            let status = run_evaluate(&cfg, yesterday())?;
            println!("[evaluate] {status}");
            run_notify(&cfg).await?;
        }
    }

    Ok(())
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn yesterday() -> NaiveDate {
    Utc::now().date_naive() - Duration::days(1)
}

/// Fetch one or both draw feeds into the canonical files.
async fn run_ingest(cfg: &AppConfig, only: Option<Game>) -> Result<()> {
    for &game in Game::ALL {
        if only.is_some() && only != Some(game) {
            continue;
        }
        let feed: Box<dyn DrawFeed> = match game {
            Game::Powerball => Box::new(ingest::powerball::PowerballFeed::new(
                cfg.ingest.powerball_url.clone(),
                cfg.ingest.fetch_limit,
            )?),
            Game::MegaMillions => Box::new(ingest::megamillions::MegaMillionsFeed::new(
                cfg.ingest.megamillions_url.clone(),
                cfg.ingest.fetch_limit,
            )?),
        };
        let count = ingest::ingest_feed(feed.as_ref(), &cfg.paths.raw_dir).await?;
        println!("[ingest] {game}: {count} draws saved");
    }
    Ok(())
}

/// Generate and persist the daily pick set.
fn run_generate(cfg: &AppConfig, date: NaiveDate, seed_override: Option<u64>) -> Result<()> {
    let seed = seed_override.or(cfg.picks.seed);
    let pick_set = picks::generate_for_date(date, cfg.picks.lines_per_game, seed);
    let path = store::write_picks(&cfg.paths.generated_dir, &pick_set)?;
    println!(
        "[generate] {} lines for {date} -> {}",
        pick_set.lines.len(),
        path.display()
    );
    Ok(())
}

/// Evaluate a date's picks. Returns the human-readable status line.
///
/// Terminal states, all non-fatal:
/// - no picks file: terminate, no report;
/// - picks but no draw for either game: minimal report;
/// - otherwise: full report.
fn run_evaluate(cfg: &AppConfig, date: NaiveDate) -> Result<String> {
    let Some(lines) = store::load_picks(&cfg.paths.generated_dir, date)? else {
        return Ok(format!("No picks file found for {date}. Nothing to evaluate."));
    };

    let draws = store::draws_for_date(&cfg.paths.raw_dir, date)?;

    // Explain each absent game: off-schedule is expected, a scheduled day
    // without a record suggests the source has not updated yet.
    for &game in Game::ALL {
        if draws.contains_key(&game) {
            continue;
        }
        if game.draws_on(date.weekday()) {
            warn!(%game, %date, "Scheduled draw day but no record ingested yet");
        } else {
            info!(%game, %date, "No draw scheduled for this game");
        }
    }

    let rep = if draws.is_empty() {
        report::build_empty(
            date,
            format!("No draw record found for either game on {date}."),
        )
    } else {
        report::build(aggregator::evaluate(date, &lines, &draws))
    };

    let summary = rep.summary();
    let path = store::write_report(&cfg.paths.reports_dir, &rep)?;
    Ok(format!("{summary} Wrote -> {}", path.display()))
}

/// Build and send the daily digest. Missing picks or report files are
/// normal — the digest just says so.
async fn run_notify(cfg: &AppConfig) -> Result<()> {
    let picks_file = store::picks_path(&cfg.paths.generated_dir, today());
    let pick_set = if picks_file.exists() {
        let json = std::fs::read_to_string(&picks_file)?;
        serde_json::from_str(&json).ok()
    } else {
        None
    };
    let rep = store::load_report(&cfg.paths.reports_dir, yesterday())?;

    let digest = notify::build_digest(pick_set.as_ref(), rep.as_ref());
    println!("{digest}");

    match notify::telegram::TelegramNotifier::from_config(&cfg.alerts)? {
        Some(notifier) => {
            notifier.send(&digest).await?;
            info!(channel = notifier.name(), "Digest delivered");
        }
        None => info!("Telegram alerts disabled — digest printed only"),
    }

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("drawlab=info"));

    let json_logging = std::env::var("DRAWLAB_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
