use thiserror::Error;

use crate::months::YearMonth;

/// Failure of the page source for one month.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("fetch for {year}-{month:02} failed")]
    Fetch {
        year: i32,
        month: u32,
        #[source]
        source: FetchError,
    },

    #[error("start month {start} is after end month {end}")]
    InvalidRange { start: YearMonth, end: YearMonth },

    #[error("invalid month {0:?}, expected YYYY-MM")]
    InvalidMonth(String),

    #[error("unknown team {0:?}")]
    UnknownTeam(String),

    #[error("invalid team profile: {0}")]
    InvalidProfile(String),
}

pub type Result<T, E = ScheduleError> = std::result::Result<T, E>;
