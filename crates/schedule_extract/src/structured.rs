//! Primary pass over the known schedule list markup.
//!
//! Each `<li>` of the schedule list must carry a day, an opponent and a
//! venue; anything less is skipped whole.

use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::dedup::dedup_by_identity;
use crate::document::TextNode;
use crate::error::{Result, ScheduleError};
use crate::game::{Game, RawFixture, VenueRelation};
use crate::months::YearMonth;
use crate::profile::TeamProfile;
use crate::skips::SkipStats;
use crate::text::{classify_optional, TimeParser, TimeToken};

/// CSS selectors describing the schedule list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredLayout {
    pub entry: String,
    pub day: String,
    pub opponent: String,
    pub venue: String,
    pub start_time: String,
    pub home_away: String,
}

impl Default for StructuredLayout {
    fn default() -> Self {
        Self {
            entry: "div.tmpl_schedule_list ul.schedule-ul > li".into(),
            day: "p.day".into(),
            opponent: "td.team-name p".into(),
            venue: "p.stadium-name".into(),
            start_time: "p.start-time".into(),
            home_away: "p.a-h".into(),
        }
    }
}

pub struct StructuredExtractor {
    entry: Selector,
    day: Selector,
    opponent: Selector,
    venue: Selector,
    start_time: Selector,
    home_away: Selector,
    re_day: Regex,
    time: TimeParser,
    home_venues: Vec<String>,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ScheduleError::InvalidProfile(format!("bad selector {css:?}: {e}")))
}

impl StructuredExtractor {
    pub fn new(profile: &TeamProfile, layout: &StructuredLayout) -> Result<Self> {
        Ok(Self {
            entry: selector(&layout.entry)?,
            day: selector(&layout.day)?,
            opponent: selector(&layout.opponent)?,
            venue: selector(&layout.venue)?,
            start_time: selector(&layout.start_time)?,
            home_away: selector(&layout.home_away)?,
            re_day: Regex::new(r"(\d{1,2})[./](\d{1,2})").expect("day regex"),
            time: TimeParser::new(),
            home_venues: profile.home_venues.clone(),
        })
    }

    /// Games listed for `target`, deduplicated; empty when the layout is absent.
    pub fn extract(&self, doc: &Html, target: YearMonth, stats: &mut SkipStats) -> Vec<Game> {
        let mut games = Vec::new();
        for item in doc.select(&self.entry) {
            if let Some(raw) = self.entry_fixture(item, target, stats) {
                games.push(Game::from(raw));
            }
        }
        dedup_by_identity(games)
    }

    fn field(item: ElementRef<'_>, sel: &Selector) -> Option<String> {
        item.select(sel).next().map(|el| el.flattened_text())
    }

    fn entry_fixture(
        &self,
        item: ElementRef<'_>,
        target: YearMonth,
        stats: &mut SkipStats,
    ) -> Option<RawFixture> {
        let (Some(day), Some(opponent), Some(venue)) = (
            Self::field(item, &self.day),
            Self::field(item, &self.opponent),
            Self::field(item, &self.venue),
        ) else {
            stats.missing_fields += 1;
            return None;
        };
        if opponent.is_empty() || venue.is_empty() {
            stats.missing_fields += 1;
            return None;
        }

        let Some((month, day_of_month)) = self.re_day.captures(&day).and_then(|c| {
            Some((c[1].parse::<u32>().ok()?, c[2].parse::<u32>().ok()?))
        }) else {
            stats.bad_date += 1;
            return None;
        };
        if month != target.month {
            debug!("Skipping {} listed on the {} page", day, target);
            stats.other_month += 1;
            return None;
        }
        let Some(date) = NaiveDate::from_ymd_opt(target.year, month, day_of_month) else {
            stats.bad_date += 1;
            return None;
        };

        let time_text = Self::field(item, &self.start_time).unwrap_or_default();
        let time = classify_optional(&self.time, &time_text);
        if time == TimeToken::Unparsed {
            stats.unparsed_times += 1;
        }

        let tag = Self::field(item, &self.home_away).unwrap_or_default().to_uppercase();
        let venue_relation = if !tag.is_empty() {
            if tag.contains("HOME") { VenueRelation::Home } else { VenueRelation::Away }
        } else if self.home_venues.iter().any(|h| venue.contains(h.as_str())) {
            VenueRelation::Home
        } else {
            VenueRelation::Away
        };

        Some(RawFixture { date, opponent, venue, time, venue_relation })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day: &str, opp: &str, venue: &str, time: &str, tag: Option<&str>) -> String {
        let tag = tag.map(|t| format!(r#"<p class="a-h">{t}</p>"#)).unwrap_or_default();
        format!(
            r#"<li><p class="day">{day}</p>{tag}
                <table><tr><td class="team-name"><p>{opp}</p></td></tr></table>
                <p class="stadium-name">{venue}</p><p class="start-time">{time}</p></li>"#
        )
    }

    fn page(entries: &[String]) -> Html {
        Html::parse_document(&format!(
            r#"<html><body><div class="tmpl_schedule_list"><ul class="schedule-ul">{}</ul></div></body></html>"#,
            entries.concat()
        ))
    }

    fn extractor() -> StructuredExtractor {
        let profile = TeamProfile::builtin("alvark").unwrap();
        StructuredExtractor::new(&profile, &StructuredLayout::default()).unwrap()
    }

    fn oct() -> YearMonth {
        YearMonth::new(2025, 10).unwrap()
    }

    #[test]
    fn reads_entries_and_classifies_venue() {
        let doc = page(&[
            entry("10.4 (土)", "琉球ゴールデンキングス", "TOYOTA ARENA TOKYO", "18:05", None),
            entry("10/8 (水)", "千葉ジェッツ", "ららアリーナ 東京ベイ", "TIP OFF 19:05", None),
        ]);
        let mut stats = SkipStats::default();
        let games = extractor().extract(&doc, oct(), &mut stats);

        assert_eq!(games.len(), 2);
        assert_eq!(games[0].opponent(), "琉球ゴールデンキングス");
        assert_eq!(games[0].venue_relation(), VenueRelation::Home);
        assert_eq!(games[0].date().to_string(), "2025-10-04");
        assert_eq!(games[1].venue_relation(), VenueRelation::Away);
        assert_eq!(games[1].start_time().map(|t| t.format("%H:%M").to_string()).as_deref(), Some("19:05"));
        assert_eq!(stats, SkipStats::default());
    }

    #[test]
    fn explicit_tag_overrides_venue() {
        let doc = page(&[entry("10.4", "琉球", "TOYOTA ARENA TOKYO", "18:05", Some("away"))]);
        let games = extractor().extract(&doc, oct(), &mut SkipStats::default());
        assert_eq!(games[0].venue_relation(), VenueRelation::Away);

        let doc = page(&[entry("10.4", "琉球", "沖縄アリーナ", "18:05", Some("HOME GAME"))]);
        let games = extractor().extract(&doc, oct(), &mut SkipStats::default());
        assert_eq!(games[0].venue_relation(), VenueRelation::Home);
    }

    #[test]
    fn skips_incomplete_and_cross_month_entries() {
        let doc = page(&[
            r#"<li><p class="day">10.11</p><p class="stadium-name">X</p></li>"#.to_string(),
            entry("11.1 (土)", "群馬", "太田市総合体育館", "15:05", None),
            entry("10.32", "群馬", "太田市総合体育館", "15:05", None),
            entry("TBD", "群馬", "太田市総合体育館", "15:05", None),
            entry("10.12", "宇都宮", "日環アリーナ栃木", "時間未定", None),
        ]);
        let mut stats = SkipStats::default();
        let games = extractor().extract(&doc, oct(), &mut stats);

        assert_eq!(games.len(), 1);
        assert_eq!(games[0].opponent(), "宇都宮");
        assert_eq!(games[0].start_time(), None);
        assert_eq!(stats.missing_fields, 1);
        assert_eq!(stats.other_month, 1);
        assert_eq!(stats.bad_date, 2);
        assert_eq!(stats.unparsed_times, 0);
    }

    #[test]
    fn garbled_time_is_counted_but_kept() {
        let doc = page(&[entry("10.4", "琉球", "TOYOTA ARENA TOKYO", "開始 TBA", None)]);
        let mut stats = SkipStats::default();
        let games = extractor().extract(&doc, oct(), &mut stats);
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].start_time(), None);
        assert_eq!(stats.unparsed_times, 1);
    }

    #[test]
    fn duplicate_entries_collapse() {
        let doc = page(&[
            entry("10.4", "琉球", "TOYOTA ARENA TOKYO", "時間未定", None),
            entry("10.4", "琉球", "TOYOTA ARENA TOKYO", "18:05", None),
        ]);
        let games = extractor().extract(&doc, oct(), &mut SkipStats::default());
        assert_eq!(games.len(), 1);
        assert!(games[0].start_time().is_some());
    }

    #[test]
    fn missing_layout_yields_nothing() {
        let doc = Html::parse_document("<html><body><p>10.4 vs 琉球 @TOYOTA ARENA TOKYO</p></body></html>");
        assert!(extractor().extract(&doc, oct(), &mut SkipStats::default()).is_empty());
    }

    #[test]
    fn bad_selector_is_a_profile_error() {
        let profile = TeamProfile::builtin("alvark").unwrap();
        let layout = StructuredLayout { entry: "li[[".into(), ..StructuredLayout::default() };
        assert!(matches!(
            StructuredExtractor::new(&profile, &layout),
            Err(ScheduleError::InvalidProfile(_))
        ));
    }
}
