// Fetch window domain model
use chrono::{Datelike, Days, NaiveDate};
use std::fmt;

/// Inclusive calendar-date range requested from the upstream source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchWindow {
    /// Returns `None` when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The window grown by `days` on both sides. The upstream interprets
    /// dates in its own local time, so a padded request fully covers every
    /// UTC day of the original window.
    pub fn padded(&self, days: u64) -> FetchWindow {
        FetchWindow {
            start: self.start.checked_sub_days(Days::new(days)).unwrap_or(self.start),
            end: self.end.checked_add_days(Days::new(days)).unwrap_or(self.end),
        }
    }

    /// Split into one window per calendar year touched.
    pub fn year_chunks(&self) -> Vec<FetchWindow> {
        let mut chunks = Vec::new();
        let mut chunk_start = self.start;

        while chunk_start <= self.end {
            let year_end = NaiveDate::from_ymd_opt(chunk_start.year(), 12, 31).unwrap_or(self.end);
            let chunk_end = year_end.min(self.end);
            chunks.push(FetchWindow {
                start: chunk_start,
                end: chunk_end,
            });

            match chunk_end.succ_opt() {
                Some(next) => chunk_start = next,
                None => break,
            }
        }

        chunks
    }
}

impl fmt::Display for FetchWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}
