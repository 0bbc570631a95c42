//! Calendar-import CSV for fixtures.
//!
//! Seven fixed columns, UTF-8 with a byte-order mark, `True`/`False` all-day
//! flag. Untimed fixtures become all-day events with a marker in the subject.

pub mod diff;
pub mod reader;
pub mod writer;

use chrono::Duration;
use thiserror::Error;

pub use diff::{compare, compare_files, compare_readers, DiffReport, Divergence};
pub use reader::{read_records, read_records_from_path};
pub use writer::{game_row, write_games, write_games_to_path};

pub const HEADERS: [&str; 7] = [
    "Subject",
    "Start Date",
    "Start Time",
    "End Date",
    "End Time",
    "All Day Event",
    "Location",
];

pub const UTF8_BOM: &str = "\u{feff}";

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("unexpected header row {found:?}")]
    SchemaMismatch { found: Vec<String> },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Output constants for the import file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarFormat {
    pub event_duration: Duration,
    /// Appended to the subject of fixtures without a start time.
    pub undecided_suffix: String,
}

impl Default for CalendarFormat {
    fn default() -> Self {
        Self {
            event_duration: Duration::minutes(150),
            undecided_suffix: " ※時刻未定".to_string(),
        }
    }
}
