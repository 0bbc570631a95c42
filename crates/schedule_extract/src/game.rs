//! The canonical fixture record and its construction from raw extractor output.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::months::YearMonth;
use crate::text::TimeToken;

/// Relation of the tracked team to the venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VenueRelation {
    Home,
    Away,
}

impl VenueRelation {
    /// `[HOME]` / `[AWAY]` subject prefix.
    pub fn tag(self) -> &'static str {
        match self {
            VenueRelation::Home => "[HOME]",
            VenueRelation::Away => "[AWAY]",
        }
    }
}

impl fmt::Display for VenueRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Identity used for deduplication: (`YYYY-MM-DD`, opponent, venue).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub date: String,
    pub opponent: String,
    pub venue: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    venue_relation: VenueRelation,
    opponent: String,
    venue: String,
    date: NaiveDate,
    start_time: Option<NaiveTime>,
}

impl Game {
    pub fn venue_relation(&self) -> VenueRelation {
        self.venue_relation
    }

    pub fn opponent(&self) -> &str {
        &self.opponent
    }

    pub fn venue(&self) -> &str {
        &self.venue
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// `None` means the start time is not (yet) known.
    pub fn start_time(&self) -> Option<NaiveTime> {
        self.start_time
    }

    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey {
            date: self.date.format("%Y-%m-%d").to_string(),
            opponent: self.opponent.clone(),
            venue: self.venue.clone(),
        }
    }

    /// Start and end instants for a timed fixture.
    pub fn time_bounds(&self, duration: Duration) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let start = self.date.and_time(self.start_time?);
        Some((start, start + duration))
    }
}

/// Field tuple produced by an extractor before it becomes a [`Game`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFixture {
    pub date: NaiveDate,
    pub opponent: String,
    pub venue: String,
    pub time: TimeToken,
    pub venue_relation: VenueRelation,
}

impl RawFixture {
    /// Opponent and venue non-empty and the date inside the target month.
    pub fn is_complete_for(&self, target: YearMonth) -> bool {
        use chrono::Datelike;
        !self.opponent.is_empty() && !self.venue.is_empty() && self.date.month() == target.month
    }
}

impl From<RawFixture> for Game {
    fn from(raw: RawFixture) -> Self {
        Game {
            venue_relation: raw.venue_relation,
            opponent: raw.opponent,
            venue: raw.venue,
            date: raw.date,
            start_time: raw.time.time(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::raw;

    #[test]
    fn identity_key_uses_iso_date() {
        let game = Game::from(raw((2025, 10, 4), "琉球", "TOYOTA ARENA TOKYO", Some((18, 5))));
        assert_eq!(
            game.identity_key(),
            IdentityKey {
                date: "2025-10-04".to_string(),
                opponent: "琉球".to_string(),
                venue: "TOYOTA ARENA TOKYO".to_string(),
            }
        );
    }

    #[test]
    fn time_bounds_span_the_duration() {
        let game = Game::from(raw((2025, 10, 4), "A", "B", Some((22, 30))));
        let (start, end) = game.time_bounds(Duration::minutes(150)).unwrap();
        assert_eq!(start.to_string(), "2025-10-04 22:30:00");
        assert_eq!(end.to_string(), "2025-10-05 01:00:00");

        let undecided = Game::from(raw((2025, 10, 4), "A", "B", None));
        assert_eq!(undecided.time_bounds(Duration::minutes(150)), None);
    }

    #[test]
    fn garbled_time_collapses_to_absent() {
        let mut r = raw((2025, 10, 4), "A", "B", None);
        r.time = TimeToken::Unparsed;
        assert_eq!(Game::from(r).start_time(), None);
    }

    #[test]
    fn completeness_checks_month_and_fields() {
        let target = YearMonth::new(2025, 10).unwrap();
        assert!(raw((2025, 10, 4), "A", "B", None).is_complete_for(target));
        assert!(!raw((2025, 11, 1), "A", "B", None).is_complete_for(target));
        assert!(!raw((2025, 10, 4), "", "B", None).is_complete_for(target));
        assert!(!raw((2025, 10, 4), "A", "", None).is_complete_for(target));
    }
}
