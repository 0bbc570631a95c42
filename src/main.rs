/// B.League schedule → calendar import CSV
///
/// Co dělá:
///   1. scrape: stáhne měsíční stránky rozpisu klubu, vytáhne zápasy
///      (structured pass, při prázdném výsledku heuristic pass), seřadí je
///      a zapíše CSV pro import do kalendáře
///   2. validate: porovná dva CSV soubory řádek po řádku
///   3. teams: vypíše vestavěné profily týmů
///
/// Spuštění:
///   cargo run -- scrape --team alvark --start 2025-10 --end 2026-05 --out alvark.csv
///   cargo run -- validate --actual alvark.csv --expected golden.csv

mod config;

use anyhow::{Context, Result};
use calendar_csv::{compare_files, write_games_to_path, CalendarFormat};
use clap::{Parser, Subcommand};
use config::AppConfig;
use dotenv::dotenv;
use logger::{now_iso, EventLogger, ScrapeFinishedEvent, ValidationFinishedEvent};
use schedule_extract::{builtin_profiles, months_between, ScheduleError, ScheduleScraper, TeamProfile, YearMonth};
use schedule_fetcher::HttpFetcher;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "bleague-calendar", about = "B.League schedule pages to calendar import CSV")]
struct Cli {
    /// Directory for JSONL run events (overrides SCHEDULE_LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape month pages and export the calendar CSV
    Scrape {
        /// Built-in team id (see `teams`)
        #[arg(long, required_unless_present = "profile")]
        team: Option<String>,
        /// Team profile JSON file instead of a built-in team
        #[arg(long, conflicts_with = "team")]
        profile: Option<PathBuf>,
        /// First month, YYYY-MM
        #[arg(long)]
        start: YearMonth,
        /// Last month (inclusive), YYYY-MM
        #[arg(long)]
        end: YearMonth,
        /// Output CSV path
        #[arg(long)]
        out: PathBuf,
        /// Per-request timeout in seconds (overrides SCHEDULE_FETCH_TIMEOUT_SECS)
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Compare a produced CSV with an expected one
    Validate {
        #[arg(long)]
        actual: PathBuf,
        #[arg(long)]
        expected: PathBuf,
    },
    /// List built-in team profiles
    Teams,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    if let Some(dir) = cli.log_dir {
        config.log_dir = dir;
    }

    match cli.command {
        Command::Scrape { team, profile, start, end, out, timeout } => {
            if let Some(secs) = timeout.filter(|s| *s > 0) {
                config.fetch_timeout_secs = secs;
            }
            let profile = resolve_profile(team.as_deref(), profile.as_deref())?;
            run_scrape(&config, profile, start, end, &out).await
        }
        Command::Validate { actual, expected } => {
            let equal = run_validate(&config, &actual, &expected)?;
            if !equal {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Teams => {
            for p in builtin_profiles() {
                println!("{},{}", p.id, p.name);
            }
            Ok(())
        }
    }
}

fn resolve_profile(team: Option<&str>, profile_path: Option<&Path>) -> Result<TeamProfile> {
    if let Some(path) = profile_path {
        return TeamProfile::from_json_file(path).context("Failed to load team profile");
    }
    let id = team.unwrap_or_default();
    TeamProfile::builtin(id).ok_or_else(|| ScheduleError::UnknownTeam(id.to_string()).into())
}

async fn run_scrape(
    config: &AppConfig,
    profile: TeamProfile,
    start: YearMonth,
    end: YearMonth,
    out: &Path,
) -> Result<()> {
    // range errors surface before any request goes out
    let range = months_between(start, end)?;
    info!("=== {} schedule {} .. {} ({} months) ===", profile.name, range.start(), range.end(), range.span());

    let fetcher = HttpFetcher::new(&config.fetcher())?;
    let events = EventLogger::new(&config.log_dir);
    let scraper = ScheduleScraper::new(fetcher, profile)?.with_event_log(events);

    let report = scraper.scrape(range).await?;
    write_games_to_path(out, &report.games, &CalendarFormat::default())
        .with_context(|| format!("Failed to write {}", out.display()))?;

    info!("Skipped {} unusable entries across {} months", report.skipped(), report.months.len());
    let _ = EventLogger::new(&config.log_dir).log(&ScrapeFinishedEvent {
        ts: now_iso(),
        event: "SCRAPE_FINISHED",
        team: scraper.profile().id.clone(),
        start: start.to_string(),
        end: end.to_string(),
        months: report.months.len(),
        games: report.games.len(),
        output: out.display().to_string(),
    });

    println!("Wrote {} rows to {}", report.games.len(), out.display());
    Ok(())
}

fn run_validate(config: &AppConfig, actual: &Path, expected: &Path) -> Result<bool> {
    let report = compare_files(actual, expected)
        .with_context(|| format!("Failed to compare {} with {}", actual.display(), expected.display()))?;

    let _ = EventLogger::new(&config.log_dir).log(&ValidationFinishedEvent {
        ts: now_iso(),
        event: "VALIDATION_FINISHED",
        actual: actual.display().to_string(),
        expected: expected.display().to_string(),
        equal: report.is_equal(),
        divergences: report.divergences.len(),
    });

    if report.is_equal() {
        println!("✅ CSVs match exactly.");
    } else {
        println!("❌ CSVs differ.");
        print!("{report}");
    }
    Ok(report.is_equal())
}
