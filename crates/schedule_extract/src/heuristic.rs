//! Fallback pass: pattern rules over the flattened text of every node.
//!
//! Each field is resolved by an ordered list of rules. The first rule that
//! hits decides; a rule may also reject the node outright (an ill-formed date
//! does that). Home/away is different: its rules are all applied and the last
//! one with an opinion wins.
//!
//! Containers and their children both get scanned, so one fixture is usually
//! found several times. The identity-key dedup at the end collapses those.
//! A container holding several fixtures is skipped as ambiguous; its fields
//! could otherwise be stitched together from different entries.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use scraper::Html;
use tracing::debug;

use crate::dedup::dedup_by_identity;
use crate::document::{walk, TextNode};
use crate::game::{Game, RawFixture, VenueRelation};
use crate::months::YearMonth;
use crate::profile::TeamProfile;
use crate::skips::SkipStats;
use crate::text::{TimeParser, TimeToken};

/// Labels that end an opponent name or introduce a venue.
const FIELD_LABELS: &str = "会場|日時|時間|(?i:venue)";
/// Characters trimmed off resolved opponents.
const OPPONENT_TRIM: &[char] = &[' ', '-', '|', '｜', ':', '：'];
/// Characters trimmed off resolved venues.
const VENUE_TRIM: &[char] = &[' ', '、', '，', ',', ')', '|', '）', ']'];

enum Outcome<T> {
    /// Rule does not apply; try the next one.
    Pass,
    Hit(T),
    /// Node is unusable; stop trying.
    Reject,
}

type Rule<T> = fn(&Scan<'_>) -> Outcome<T>;
type RelationRule = fn(&Scan<'_>, &str) -> Option<VenueRelation>;

const DATE_RULES: &[(&str, Rule<NaiveDate>)] = &[
    ("full_date", date_full),
    ("month_day", date_month_day),
];

const OPPONENT_RULES: &[(&str, Rule<String>)] = &[
    ("vs_token", opponent_vs_token),
    ("vs_split", opponent_vs_split),
];

const VENUE_RULES: &[(&str, Rule<String>)] = &[
    ("at_marker", venue_at_marker),
    ("venue_label", venue_label),
    ("known_venue", venue_known),
];

const RELATION_RULES: &[(&str, RelationRule)] = &[
    ("home_venue", relation_home_venue),
    ("home_token", relation_home_token),
    ("away_token", relation_away_token),
];

struct Patterns {
    full_date: Regex,
    month_day: Regex,
    vs_token: Regex,
    vs: Regex,
    opponent_stop: Regex,
    at_venue: Regex,
    label_venue: Regex,
}

impl Patterns {
    fn new() -> Self {
        // A venue runs until whitespace followed by a time/date digit, a
        // HOME/AWAY tag, a separator, a field label or the end of the text.
        let venue_end = format!(r"(?:\s+(?:\d|HOME\b|AWAY\b|[|｜]|(?i:vs\b)|{FIELD_LABELS})|$)");
        Self {
            full_date: Regex::new(r"(\d{4})[./-](\d{1,2})[./-](\d{1,2})").expect("full date regex"),
            month_day: Regex::new(r"(\d{1,2})[./-](\d{1,2})").expect("month/day regex"),
            vs_token: Regex::new(r"(?i)vs\s*([^\s@＠|｜]+)").expect("vs token regex"),
            vs: Regex::new(r"(?i)vs").expect("vs regex"),
            opponent_stop: Regex::new(&format!("[@＠]|{FIELD_LABELS}")).expect("opponent stop regex"),
            at_venue: Regex::new(&format!(r"[@＠]\s*(\S.*?){venue_end}")).expect("at venue regex"),
            label_venue: Regex::new(&format!(r"(?:会場|(?i:venue))\s*[:：]\s*(\S.*?){venue_end}"))
                .expect("venue label regex"),
        }
    }
}

/// One candidate node under inspection.
struct Scan<'a> {
    text: &'a str,
    target: YearMonth,
    patterns: &'a Patterns,
    profile: &'a TeamProfile,
}

fn first_hit<T>(field: &str, rules: &[(&str, Rule<T>)], scan: &Scan<'_>) -> Option<T> {
    for (name, rule) in rules {
        match rule(scan) {
            Outcome::Hit(value) => {
                debug!(field, rule = name, "resolved");
                return Some(value);
            }
            Outcome::Reject => {
                debug!(field, rule = name, "node rejected");
                return None;
            }
            Outcome::Pass => {}
        }
    }
    None
}

// ── date ──────────────────────────────────────────────────────────────────────

fn ymd(y: i32, m: &str, d: &str) -> Outcome<NaiveDate> {
    let date = m
        .parse::<u32>()
        .ok()
        .zip(d.parse::<u32>().ok())
        .and_then(|(m, d)| NaiveDate::from_ymd_opt(y, m, d));
    match date {
        Some(date) => Outcome::Hit(date),
        None => Outcome::Reject,
    }
}

fn date_full(scan: &Scan<'_>) -> Outcome<NaiveDate> {
    let Some(c) = scan.patterns.full_date.captures(scan.text) else {
        return Outcome::Pass;
    };
    match c[1].parse::<i32>() {
        Ok(year) => ymd(year, &c[2], &c[3]),
        Err(_) => Outcome::Reject,
    }
}

fn date_month_day(scan: &Scan<'_>) -> Outcome<NaiveDate> {
    match scan.patterns.month_day.captures(scan.text) {
        Some(c) => ymd(scan.target.year, &c[1], &c[2]),
        None => Outcome::Pass,
    }
}

// ── opponent ──────────────────────────────────────────────────────────────────

fn opponent_vs_token(scan: &Scan<'_>) -> Outcome<String> {
    match scan.patterns.vs_token.captures(scan.text) {
        Some(c) => Outcome::Hit(c[1].to_string()),
        None => Outcome::Pass,
    }
}

fn opponent_vs_split(scan: &Scan<'_>) -> Outcome<String> {
    let Some(tail) = scan.patterns.vs.splitn(scan.text, 2).nth(1) else {
        return Outcome::Pass;
    };
    let head = scan.patterns.opponent_stop.split(tail).next().unwrap_or_default();
    let opponent = head.trim_matches(OPPONENT_TRIM);
    if opponent.is_empty() {
        Outcome::Pass
    } else {
        Outcome::Hit(opponent.to_string())
    }
}

// ── venue ─────────────────────────────────────────────────────────────────────

/// A capture that begins with a known venue name is cut back to that name.
fn venue_capture(re: &Regex, scan: &Scan<'_>) -> Outcome<String> {
    let Some(c) = re.captures(scan.text) else {
        return Outcome::Pass;
    };
    let captured = c[1].trim_matches(VENUE_TRIM);
    let known = scan
        .profile
        .known_venues
        .iter()
        .filter(|v| !v.is_empty() && captured.starts_with(v.as_str()))
        .max_by_key(|v| v.len());
    match known {
        Some(v) => Outcome::Hit(v.clone()),
        None if captured.is_empty() => Outcome::Pass,
        None => Outcome::Hit(captured.to_string()),
    }
}

fn venue_at_marker(scan: &Scan<'_>) -> Outcome<String> {
    venue_capture(&scan.patterns.at_venue, scan)
}

fn venue_label(scan: &Scan<'_>) -> Outcome<String> {
    venue_capture(&scan.patterns.label_venue, scan)
}

fn venue_known(scan: &Scan<'_>) -> Outcome<String> {
    match scan.profile.known_venues.iter().find(|v| scan.text.contains(v.as_str())) {
        Some(v) => Outcome::Hit(v.clone()),
        None => Outcome::Pass,
    }
}

// ── home / away ───────────────────────────────────────────────────────────────

fn relation_home_venue(scan: &Scan<'_>, venue: &str) -> Option<VenueRelation> {
    scan.profile.is_home_venue(venue).then_some(VenueRelation::Home)
}

fn relation_home_token(scan: &Scan<'_>, _venue: &str) -> Option<VenueRelation> {
    scan.text.contains("HOME").then_some(VenueRelation::Home)
}

fn relation_away_token(scan: &Scan<'_>, _venue: &str) -> Option<VenueRelation> {
    scan.text.contains("AWAY").then_some(VenueRelation::Away)
}

fn resolve_relation(scan: &Scan<'_>, venue: &str) -> VenueRelation {
    RELATION_RULES
        .iter()
        .fold(VenueRelation::Away, |current, (_, rule)| rule(scan, venue).unwrap_or(current))
}

// ── extractor ─────────────────────────────────────────────────────────────────

pub struct HeuristicExtractor {
    profile: TeamProfile,
    patterns: Patterns,
    time: TimeParser,
}

impl HeuristicExtractor {
    pub fn new(profile: &TeamProfile) -> Self {
        Self {
            profile: profile.clone(),
            patterns: Patterns::new(),
            time: TimeParser::new(),
        }
    }

    /// Games found anywhere in the document for `target`, deduplicated.
    pub fn extract(&self, doc: &Html, target: YearMonth, stats: &mut SkipStats) -> Vec<Game> {
        self.extract_nodes(doc.root_element(), target, stats)
    }

    /// Scan `root` and every descendant node.
    pub fn extract_nodes<N: TextNode>(&self, root: N, target: YearMonth, stats: &mut SkipStats) -> Vec<Game> {
        let mut games = Vec::new();
        walk(root, |node| {
            let text = node.flattened_text();
            if let Some(raw) = self.scan_text(&text, target, stats) {
                games.push(Game::from(raw));
            }
        });
        dedup_by_identity(games)
    }

    fn is_candidate(&self, text: &str) -> bool {
        text.to_lowercase().contains("vs")
            || self.profile.candidate_markers.iter().any(|m| text.contains(m.as_str()))
    }

    /// More than one `vs`, or more than one date, means several fixtures.
    fn is_ambiguous(&self, text: &str) -> bool {
        let p = &self.patterns;
        let dates = match p.full_date.find_iter(text).count() {
            0 => p.month_day.find_iter(text).count(),
            n => n,
        };
        p.vs.find_iter(text).count() > 1 || dates > 1
    }

    fn scan_text(&self, text: &str, target: YearMonth, stats: &mut SkipStats) -> Option<RawFixture> {
        if text.is_empty() || !self.is_candidate(text) {
            return None;
        }
        if self.is_ambiguous(text) {
            debug!("ambiguous node skipped: {}", text);
            stats.ambiguous += 1;
            return None;
        }
        let scan = Scan { text, target, patterns: &self.patterns, profile: &self.profile };

        let Some(date) = first_hit("date", DATE_RULES, &scan) else {
            stats.bad_date += 1;
            return None;
        };
        if date.month() != target.month {
            stats.other_month += 1;
            return None;
        }
        let Some(opponent) = first_hit("opponent", OPPONENT_RULES, &scan) else {
            stats.no_opponent += 1;
            return None;
        };
        let Some(venue) = first_hit("venue", VENUE_RULES, &scan) else {
            stats.no_venue += 1;
            return None;
        };

        let time = self.time.classify(text);
        if time == TimeToken::Unparsed && self.time.extract(text).is_some() {
            stats.unparsed_times += 1;
        }
        let venue_relation = resolve_relation(&scan, &venue);

        let raw = RawFixture { date, opponent, venue, time, venue_relation };
        raw.is_complete_for(target).then_some(raw)
    }
}
