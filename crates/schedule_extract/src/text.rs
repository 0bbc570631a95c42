//! Text normalization shared by both extraction passes.

use chrono::NaiveTime;
use regex::Regex;

/// Tokens announcing that a start time has not been published yet.
pub const UNDECIDED_MARKERS: &[&str] = &["未定", "undecided"];

/// What a piece of schedule text says about the start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeToken {
    /// The text carries an explicit "not decided yet" marker.
    Undecided,
    /// Something shaped like `H:MM` is present but is not a wall-clock time.
    Unparsed,
    At(NaiveTime),
}

impl TimeToken {
    pub fn time(self) -> Option<NaiveTime> {
        match self {
            TimeToken::At(t) => Some(t),
            TimeToken::Undecided | TimeToken::Unparsed => None,
        }
    }
}

/// Collapse every whitespace run (ASCII or full-width) to one space and trim.
pub fn normalize_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

pub struct TimeParser {
    re_clock: Regex,
}

impl Default for TimeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeParser {
    pub fn new() -> Self {
        Self {
            re_clock: Regex::new(r"(\d{1,2}):(\d{2})").expect("clock regex"),
        }
    }

    /// The undecided marker short-circuits before any digit search; only the
    /// first `H:MM` occurrence is considered.
    pub fn classify(&self, text: &str) -> TimeToken {
        let lower = text.to_lowercase();
        if UNDECIDED_MARKERS.iter().any(|m| lower.contains(m)) {
            return TimeToken::Undecided;
        }
        let Some(caps) = self.re_clock.captures(text) else {
            return TimeToken::Unparsed;
        };
        let hh = caps[1].parse::<u32>().ok();
        let mm = caps[2].parse::<u32>().ok();
        match hh.zip(mm).and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0)) {
            Some(t) => TimeToken::At(t),
            None => TimeToken::Unparsed,
        }
    }

    /// First `HH:MM` in the text, zero-padded, unless the text is marked undecided.
    pub fn extract(&self, text: &str) -> Option<String> {
        let lower = text.to_lowercase();
        if UNDECIDED_MARKERS.iter().any(|m| lower.contains(m)) {
            return None;
        }
        let caps = self.re_clock.captures(text)?;
        let hh: u32 = caps[1].parse().ok()?;
        Some(format!("{hh:02}:{}", &caps[2]))
    }
}

/// Convenience wrapper compiling a one-off parser.
pub fn extract_time(text: &str) -> Option<String> {
    TimeParser::new().extract(text)
}

/// Like [`extract_time`] but keeps "undecided" apart from "garbled".
pub fn classify_time(text: &str) -> TimeToken {
    TimeParser::new().classify(text)
}

/// A blank text is neither undecided nor garbled; it is simply absent.
pub(crate) fn classify_optional(parser: &TimeParser, text: &str) -> TimeToken {
    if text.trim().is_empty() {
        TimeToken::Undecided
    } else {
        parser.classify(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_mixed_whitespace() {
        assert_eq!(normalize_whitespace("  10.4 \u{3000}(土)\n\t 19:05 "), "10.4 (土) 19:05");
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace(" \u{3000} "), "");
    }

    #[test]
    fn extracts_first_time() {
        assert_eq!(extract_time("19:05 tip-off").as_deref(), Some("19:05"));
        assert_eq!(extract_time("TIP OFF 9:30 / OPEN 8:00").as_deref(), Some("09:30"));
        assert_eq!(extract_time("no time here"), None);
    }

    #[test]
    fn undecided_marker_wins_over_digits() {
        assert_eq!(extract_time("time undecided"), None);
        assert_eq!(extract_time("Gate 19:05 time undecided"), None);
        assert_eq!(extract_time("試合開始 未定 (開場 17:00)"), None);
    }

    #[test]
    fn classify_separates_undecided_from_garbled() {
        assert_eq!(classify_time("時間未定"), TimeToken::Undecided);
        assert_eq!(classify_time("kickoff 25:70"), TimeToken::Unparsed);
        assert_eq!(classify_time("TBA"), TimeToken::Unparsed);
        assert_eq!(
            classify_time("18:05"),
            TimeToken::At(NaiveTime::from_hms_opt(18, 5, 0).unwrap())
        );
        assert_eq!(classify_time("kickoff 25:70").time(), None);
    }

    #[test]
    fn blank_time_is_not_counted_as_garbled() {
        let parser = TimeParser::new();
        assert_eq!(classify_optional(&parser, "  "), TimeToken::Undecided);
        assert_eq!(classify_optional(&parser, "x"), TimeToken::Unparsed);
    }
}
