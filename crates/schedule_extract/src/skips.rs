use std::ops::AddAssign;

/// Why entries or nodes were dropped during one month's extraction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SkipStats {
    pub missing_fields: usize,
    pub bad_date: usize,
    pub other_month: usize,
    pub no_opponent: usize,
    pub no_venue: usize,
    /// Text mentioning several fixtures at once (a container of entries).
    pub ambiguous: usize,
    /// Times present but not a valid clock value; the fixture is kept.
    pub unparsed_times: usize,
}

impl SkipStats {
    /// Dropped entries (unparsed times are not drops).
    pub fn skipped(&self) -> usize {
        self.missing_fields + self.bad_date + self.other_month + self.no_opponent + self.no_venue + self.ambiguous
    }
}

impl AddAssign for SkipStats {
    fn add_assign(&mut self, rhs: Self) {
        self.missing_fields += rhs.missing_fields;
        self.bad_date += rhs.bad_date;
        self.other_month += rhs.other_month;
        self.no_opponent += rhs.no_opponent;
        self.no_venue += rhs.no_venue;
        self.ambiguous += rhs.ambiguous;
        self.unparsed_times += rhs.unparsed_times;
    }
}
