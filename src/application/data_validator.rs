// Data validator - Advisory checks over a daily series
use crate::domain::dataset::{DailyRecord, HistoricalDataset};
use crate::domain::generation::Fuel;
use crate::domain::validation::{MissingDates, ValidationWarning};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Daily values below this count as zero output.
pub const ZERO_EPSILON_GWH: f64 = 0.001;

/// Longest zero run that is still considered plausible.
pub const MAX_TOLERATED_ZERO_DAYS: usize = 5;

/// Gaps with fewer missing dates than this are listed date by date.
pub const MAX_LISTED_MISSING_DATES: usize = 10;

/// Check one country's daily series, which must be sorted by date.
/// Never fails and never touches the input.
pub fn validate_series(country: &str, series: &[DailyRecord]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for fuel in Fuel::ALL {
        warnings.extend(find_zero_runs(country, fuel, series));
    }

    if let Some(gap) = find_date_gaps(country, series) {
        warnings.push(gap);
    }

    warnings
}

/// Run [`validate_series`] for every country in the dataset.
pub fn validate_dataset(dataset: &HistoricalDataset) -> Vec<ValidationWarning> {
    dataset
        .countries()
        .into_iter()
        .flat_map(|country| validate_series(country, &dataset.series_for(country)))
        .collect()
}

fn find_zero_runs(country: &str, fuel: Fuel, series: &[DailyRecord]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut run_start: Option<NaiveDate> = None;
    let mut run_length = 0usize;
    let mut previous_date: Option<NaiveDate> = None;

    let mut close_run = |start: NaiveDate, end: NaiveDate, days: usize| {
        if days > MAX_TOLERATED_ZERO_DAYS {
            warnings.push(ValidationWarning::ZeroRun {
                country: country.to_string(),
                fuel,
                start,
                end,
                days,
            });
        }
    };

    for record in series {
        if record.fuel_gwh(fuel) < ZERO_EPSILON_GWH {
            if run_length == 0 {
                run_start = Some(record.date);
            }
            run_length += 1;
        } else if let (Some(start), Some(end)) = (run_start.take(), previous_date) {
            close_run(start, end, run_length);
            run_length = 0;
        }
        previous_date = Some(record.date);
    }

    // A run still open at the end of the series ends on the final date
    if let (Some(start), Some(end)) = (run_start, previous_date) {
        close_run(start, end, run_length);
    }

    warnings
}

fn find_date_gaps(country: &str, series: &[DailyRecord]) -> Option<ValidationWarning> {
    let dates: BTreeSet<NaiveDate> = series.iter().map(|r| r.date).collect();
    let first = *dates.first()?;
    let last = *dates.last()?;

    let expected_days = (last - first).num_days() + 1;
    if dates.len() as i64 == expected_days {
        return None;
    }

    let missing: Vec<NaiveDate> = first
        .iter_days()
        .take_while(|d| *d <= last)
        .filter(|d| !dates.contains(d))
        .collect();

    let missing = if missing.len() < MAX_LISTED_MISSING_DATES {
        MissingDates::Listed(missing)
    } else {
        MissingDates::Summary {
            count: missing.len(),
            first: missing[0],
            last: missing[missing.len() - 1],
        }
    };

    Some(ValidationWarning::DateGap {
        country: country.to_string(),
        missing,
    })
}
