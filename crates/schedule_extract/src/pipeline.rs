//! Month-by-month orchestration: fetch, structured pass, heuristic fallback,
//! then one merge across the whole range.

use logger::{now_iso, EventLogger, MonthExtractedEvent};
use scraper::Html;
use tracing::{debug, info};

use crate::dedup::{merge, ExtractionPass};
use crate::error::{FetchError, Result, ScheduleError};
use crate::game::Game;
use crate::heuristic::HeuristicExtractor;
use crate::months::{MonthRange, YearMonth};
use crate::profile::TeamProfile;
use crate::skips::SkipStats;
use crate::structured::{StructuredExtractor, StructuredLayout};

/// Source of raw month pages. One call per month, no retries.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    async fn fetch_month(&self, profile: &TeamProfile, month: YearMonth) -> Result<String, FetchError>;
}

#[derive(Debug, Clone)]
pub struct MonthExtraction {
    pub month: YearMonth,
    pub pass: ExtractionPass,
    pub games: Vec<Game>,
    pub stats: SkipStats,
}

/// Both passes configured for one team.
pub struct MonthExtractor {
    structured: StructuredExtractor,
    heuristic: HeuristicExtractor,
}

impl MonthExtractor {
    pub fn new(profile: &TeamProfile) -> Result<Self> {
        Self::with_layout(profile, &StructuredLayout::default())
    }

    pub fn with_layout(profile: &TeamProfile, layout: &StructuredLayout) -> Result<Self> {
        Ok(Self {
            structured: StructuredExtractor::new(profile, layout)?,
            heuristic: HeuristicExtractor::new(profile),
        })
    }

    /// The heuristic pass only runs when the structured pass finds nothing.
    pub fn extract(&self, html: &str, month: YearMonth) -> MonthExtraction {
        let doc = Html::parse_document(html);

        let mut stats = SkipStats::default();
        let games = self.structured.extract(&doc, month, &mut stats);
        if !games.is_empty() {
            return MonthExtraction { month, pass: ExtractionPass::Structured, games, stats };
        }

        debug!("{}: schedule list empty, falling back to text scan", month);
        let mut fallback_stats = SkipStats::default();
        let games = self.heuristic.extract(&doc, month, &mut fallback_stats);
        stats += fallback_stats;
        MonthExtraction { month, pass: ExtractionPass::Heuristic, games, stats }
    }
}

#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub games: Vec<Game>,
    pub months: Vec<MonthExtraction>,
}

impl ScrapeReport {
    pub fn skipped(&self) -> usize {
        self.months.iter().map(|m| m.stats.skipped()).sum()
    }
}

pub struct ScheduleScraper<F> {
    fetcher: F,
    profile: TeamProfile,
    extractor: MonthExtractor,
    events: Option<EventLogger>,
}

impl<F: Fetcher> ScheduleScraper<F> {
    pub fn new(fetcher: F, profile: TeamProfile) -> Result<Self> {
        profile.validate()?;
        let extractor = MonthExtractor::new(&profile)?;
        Ok(Self { fetcher, profile, extractor, events: None })
    }

    pub fn with_event_log(mut self, events: EventLogger) -> Self {
        self.events = Some(events);
        self
    }

    pub fn profile(&self) -> &TeamProfile {
        &self.profile
    }

    /// Months are processed in order; the first fetch failure ends the run.
    pub async fn scrape(&self, range: MonthRange) -> Result<ScrapeReport> {
        let mut months = Vec::with_capacity(range.span());

        for month in range {
            let html = self
                .fetcher
                .fetch_month(&self.profile, month)
                .await
                .map_err(|source| ScheduleError::Fetch { year: month.year, month: month.month, source })?;

            let extraction = self.extractor.extract(&html, month);
            info!(
                team = %self.profile.id,
                pass = extraction.pass.as_str(),
                skipped = extraction.stats.skipped(),
                "{}: {} games",
                month,
                extraction.games.len()
            );
            self.log_month(&extraction);
            months.push(extraction);
        }

        let games = merge(months.iter().map(|m| (m.pass, m.games.as_slice())));
        Ok(ScrapeReport { games, months })
    }

    fn log_month(&self, m: &MonthExtraction) {
        let Some(events) = &self.events else { return };
        let _ = events.log(&MonthExtractedEvent {
            ts: now_iso(),
            event: "MONTH_EXTRACTED",
            team: self.profile.id.clone(),
            year: m.month.year,
            month: m.month.month,
            pass: m.pass.as_str().to_string(),
            games: m.games.len(),
            skipped: m.stats.skipped(),
            unparsed_times: m.stats.unparsed_times,
        });
    }
}
