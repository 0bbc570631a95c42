use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ScheduleError::InvalidMonth(format!("{year}-{month}")));
        }
        Ok(Self { year, month })
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ScheduleError;

    /// Accepts `YYYY-MM` (and `YYYY-M`).
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ScheduleError::InvalidMonth(s.to_string());
        let (y, m) = s.trim().split_once('-').ok_or_else(invalid)?;
        if y.len() != 4 || m.is_empty() || m.len() > 2 {
            return Err(invalid());
        }
        let year = y.parse::<i32>().map_err(|_| invalid())?;
        let month = m.parse::<u32>().map_err(|_| invalid())?;
        YearMonth::new(year, month).map_err(|_| invalid())
    }
}

/// Inclusive, ascending run of months. Cloning restarts the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthRange {
    start: YearMonth,
    end: YearMonth,
    cursor: Option<YearMonth>,
}

impl MonthRange {
    pub fn start(&self) -> YearMonth {
        self.start
    }

    pub fn end(&self) -> YearMonth {
        self.end
    }

    /// Number of months in the whole range, independent of iteration progress.
    pub fn span(&self) -> usize {
        let months = (self.end.year - self.start.year) * 12 + self.end.month as i32
            - self.start.month as i32;
        months as usize + 1
    }
}

impl Iterator for MonthRange {
    type Item = YearMonth;

    fn next(&mut self) -> Option<YearMonth> {
        let current = self.cursor?;
        self.cursor = (current < self.end).then(|| current.next());
        Some(current)
    }
}

/// Every month from `start` to `end` inclusive; `InvalidRange` when `start > end`.
pub fn months_between(start: YearMonth, end: YearMonth) -> Result<MonthRange> {
    if start > end {
        return Err(ScheduleError::InvalidRange { start, end });
    }
    Ok(MonthRange { start, end, cursor: Some(start) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    #[test]
    fn season_crosses_new_year() {
        let months: Vec<String> = months_between(ym("2025-10"), ym("2026-05"))
            .unwrap()
            .map(|m| m.to_string())
            .collect();
        assert_eq!(
            months,
            ["2025-10", "2025-11", "2025-12", "2026-01", "2026-02", "2026-03", "2026-04", "2026-05"]
        );
    }

    #[test]
    fn single_month_range() {
        let range = months_between(ym("2026-01"), ym("2026-01")).unwrap();
        assert_eq!(range.span(), 1);
        assert_eq!((range.start(), range.end()), (ym("2026-01"), ym("2026-01")));
        assert_eq!(range.collect::<Vec<_>>(), vec![ym("2026-01")]);
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = months_between(ym("2026-05"), ym("2025-10")).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidRange { .. }));
        assert_eq!(err.to_string(), "start month 2026-05 is after end month 2025-10");
    }

    #[test]
    fn count_matches_span_strictly_ascending() {
        for (start, end) in [("2019-01", "2019-12"), ("2020-11", "2023-02"), ("1999-12", "2000-01")] {
            let range = months_between(ym(start), ym(end)).unwrap();
            let span = range.span();
            let months: Vec<YearMonth> = range.clone().collect();
            assert_eq!(months.len(), span);
            assert!(months.windows(2).all(|w| w[0] < w[1] && w[0].next() == w[1]));
            assert_eq!(months.first(), Some(&ym(start)));
            assert_eq!(months.last(), Some(&ym(end)));
            assert_eq!((range.start(), range.end()), (ym(start), ym(end)));
            // restartable: a fresh clone walks the same sequence
            assert_eq!(range.collect::<Vec<_>>(), months);
        }
    }

    #[test]
    fn parses_and_rejects_month_strings() {
        assert_eq!(ym("2025-1"), YearMonth { year: 2025, month: 1 });
        for bad in ["2025-13", "2025-00", "25-10", "2025/10", "2025-", "oct"] {
            assert!(bad.parse::<YearMonth>().is_err(), "{bad} should be rejected");
        }
    }
}
