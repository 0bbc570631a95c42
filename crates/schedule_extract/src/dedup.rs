//! Identity-key deduplication and chronological ordering.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::game::{Game, IdentityKey};

/// Which extraction pass produced a month's records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionPass {
    Structured,
    Heuristic,
}

impl ExtractionPass {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtractionPass::Structured => "structured",
            ExtractionPass::Heuristic => "heuristic",
        }
    }
}

/// One record per identity key. The last duplicate's fields win but the
/// record keeps the position of the key's first appearance.
pub fn dedup_by_identity(games: Vec<Game>) -> Vec<Game> {
    let mut slots: HashMap<IdentityKey, usize> = HashMap::new();
    let mut out: Vec<Game> = Vec::with_capacity(games.len());
    for game in games {
        match slots.get(&game.identity_key()) {
            Some(&ix) => out[ix] = game,
            None => {
                slots.insert(game.identity_key(), out.len());
                out.push(game);
            }
        }
    }
    out
}

/// Date, then start time with undecided times last, then venue.
pub fn chronological(a: &Game, b: &Game) -> Ordering {
    a.date()
        .cmp(&b.date())
        .then_with(|| match (a.start_time(), b.start_time()) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.venue().cmp(b.venue()))
}

/// Merge per-month results into one ordered set.
///
/// Re-listings across month pages collapse on the identity key. A record from
/// the structured pass is never displaced by a heuristic one; otherwise the
/// later month wins.
pub fn merge<'a, I>(months: I) -> Vec<Game>
where
    I: IntoIterator<Item = (ExtractionPass, &'a [Game])>,
{
    let mut slots: HashMap<IdentityKey, usize> = HashMap::new();
    let mut out: Vec<(ExtractionPass, Game)> = Vec::new();

    for (pass, games) in months {
        for game in games {
            let key = game.identity_key();
            match slots.get(&key) {
                Some(&ix) => {
                    let keeps_structured =
                        out[ix].0 == ExtractionPass::Structured && pass == ExtractionPass::Heuristic;
                    if !keeps_structured {
                        out[ix] = (pass, game.clone());
                    }
                }
                None => {
                    slots.insert(key, out.len());
                    out.push((pass, game.clone()));
                }
            }
        }
    }

    let mut games: Vec<Game> = out.into_iter().map(|(_, g)| g).collect();
    games.sort_by(chronological);
    games
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::VenueRelation;
    use crate::test_support::raw;

    fn game(date: (i32, u32, u32), opp: &str, venue: &str, time: Option<(u32, u32)>) -> Game {
        Game::from(raw(date, opp, venue, time))
    }

    #[test]
    fn last_duplicate_wins_in_first_position() {
        let mut away = raw((2025, 10, 4), "琉球", "沖縄アリーナ", Some((18, 5)));
        away.venue_relation = VenueRelation::Away;
        let games = vec![
            game((2025, 10, 4), "琉球", "沖縄アリーナ", None),
            game((2025, 10, 5), "琉球", "沖縄アリーナ", None),
            Game::from(away),
        ];
        let out = dedup_by_identity(games);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].venue_relation(), VenueRelation::Away);
        assert_eq!(out[0].start_time().map(|t| t.to_string()).as_deref(), Some("18:05:00"));
        assert_eq!(out[1].date().to_string(), "2025-10-05");
    }

    #[test]
    fn dedup_is_idempotent() {
        let games = vec![
            game((2025, 11, 1), "A", "X", Some((14, 0))),
            game((2025, 11, 1), "A", "X", Some((15, 0))),
            game((2025, 11, 2), "B", "Y", None),
            game((2025, 11, 2), "B", "Y", None),
        ];
        let once = dedup_by_identity(games);
        let twice = dedup_by_identity(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn merge_sorts_untimed_last_within_a_day() {
        let oct = vec![
            game((2025, 10, 12), "C", "Zepp", None),
            game((2025, 10, 12), "B", "Arena", Some((19, 5))),
            game((2025, 10, 11), "A", "Arena", Some((18, 5))),
        ];
        let nov = vec![
            game((2025, 11, 1), "D", "Beta", Some((14, 5))),
            game((2025, 11, 1), "E", "Alpha", Some((14, 5))),
        ];
        let merged = merge([
            (ExtractionPass::Structured, oct.as_slice()),
            (ExtractionPass::Structured, nov.as_slice()),
        ]);
        let order: Vec<&str> = merged.iter().map(|g| g.opponent()).collect();
        assert_eq!(order, ["A", "B", "C", "E", "D"]);
    }

    #[test]
    fn merge_collapses_relisted_fixture() {
        let oct = vec![game((2025, 10, 31), "A", "X", None)];
        let nov = vec![game((2025, 10, 31), "A", "X", Some((19, 0)))];
        let merged = merge([
            (ExtractionPass::Structured, oct.as_slice()),
            (ExtractionPass::Structured, nov.as_slice()),
        ]);
        assert_eq!(merged.len(), 1);
        assert!(merged[0].start_time().is_some());
    }

    #[test]
    fn structured_detection_outranks_heuristic() {
        let structured = vec![game((2025, 10, 31), "A", "X", Some((19, 0)))];
        let heuristic = vec![game((2025, 10, 31), "A", "X", None)];
        let merged = merge([
            (ExtractionPass::Structured, structured.as_slice()),
            (ExtractionPass::Heuristic, heuristic.as_slice()),
        ]);
        assert_eq!(merged.len(), 1);
        assert!(merged[0].start_time().is_some());

        // the other way round the structured record replaces the heuristic one
        let merged = merge([
            (ExtractionPass::Heuristic, heuristic.as_slice()),
            (ExtractionPass::Structured, structured.as_slice()),
        ]);
        assert!(merged[0].start_time().is_some());
    }
}
