//! B.League schedule extraction
//!
//! Turns club schedule pages into deduplicated, chronologically ordered
//! fixtures. A structured pass reads the known list markup; when it finds
//! nothing, a heuristic pass scans the text of every node instead.
//!
//! Month page:
//! https://www.alvark-tokyo.jp/schedule/?scheduleYear=YYYY&scheduleMonth=M
//!
//! List entry:
//! <li> <p class="day">10.4</p> <td class="team-name"><p>琉球</p></td>
//!      <p class="stadium-name">…</p> <p class="start-time">18:05</p> </li>

pub mod dedup;
pub mod document;
pub mod error;
pub mod game;
pub mod heuristic;
pub mod months;
pub mod pipeline;
pub mod profile;
pub mod skips;
pub mod structured;
pub mod text;

pub use dedup::{dedup_by_identity, merge, ExtractionPass};
pub use error::{FetchError, ScheduleError};
pub use game::{Game, IdentityKey, RawFixture, VenueRelation};
pub use months::{months_between, MonthRange, YearMonth};
pub use pipeline::{Fetcher, MonthExtraction, MonthExtractor, ScheduleScraper, ScrapeReport};
pub use profile::{builtin_profiles, TeamProfile};
pub use skips::SkipStats;
pub use text::{classify_time, extract_time, normalize_whitespace, TimeToken};
