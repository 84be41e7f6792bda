// Data-quality warning domain model
use super::generation::Fuel;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    /// More than the tolerated number of consecutive near-zero days for one fuel
    ZeroRun {
        country: String,
        fuel: Fuel,
        start: NaiveDate,
        end: NaiveDate,
        days: usize,
    },
    /// Calendar dates missing between the first and last record
    DateGap {
        country: String,
        missing: MissingDates,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum MissingDates {
    Listed(Vec<NaiveDate>),
    Summary {
        count: usize,
        first: NaiveDate,
        last: NaiveDate,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::ZeroRun {
                country,
                fuel,
                start,
                end,
                days,
            } => write!(
                f,
                "{country}: {fuel} was zero for {days} consecutive days ({start} to {end})"
            ),
            ValidationWarning::DateGap {
                country,
                missing: MissingDates::Listed(dates),
            } => {
                let listed: Vec<String> = dates.iter().map(|d| d.to_string()).collect();
                write!(
                    f,
                    "{country}: {} missing date(s): {}",
                    dates.len(),
                    listed.join(", ")
                )
            }
            ValidationWarning::DateGap {
                country,
                missing: MissingDates::Summary { count, first, last },
            } => write!(
                f,
                "{country}: {count} missing dates between {first} and {last}"
            ),
        }
    }
}
