// Resume tracker - Works out where each country's next fetch starts
use crate::application::dataset_repository::DatasetRepository;
use crate::domain::country::Country;
use crate::domain::dataset::HistoricalDataset;
use crate::domain::window::FetchWindow;
use chrono::{Days, NaiveDate};

#[derive(Debug, Clone, PartialEq)]
pub enum CountryPlan {
    Fetch(FetchWindow),
    /// Next start falls after the run's end date
    AlreadyCurrent { next_start: NaiveDate },
}

/// Load the history, treating anything unreadable as "no history yet".
pub fn load_history(repository: &dyn DatasetRepository) -> HistoricalDataset {
    match repository.load() {
        Ok(dataset) => dataset,
        Err(e) => {
            tracing::warn!("Could not read existing dataset, starting from scratch: {}", e);
            HistoricalDataset::empty()
        }
    }
}

/// Day after the latest date on record, or the default start for a country
/// with no history.
pub fn next_start(latest: Option<NaiveDate>, default_start: NaiveDate) -> NaiveDate {
    match latest {
        Some(date) => date.succ_opt().unwrap_or(date),
        None => default_start,
    }
}

/// Plan one fetch window per country, in the order given. A forced start
/// ignores the history for every country.
pub fn plan_windows(
    countries: &[Country],
    history: &HistoricalDataset,
    default_start: NaiveDate,
    end: NaiveDate,
    forced_start: Option<NaiveDate>,
) -> Vec<(Country, CountryPlan)> {
    let latest = history.latest_dates();

    countries
        .iter()
        .map(|country| {
            let start = forced_start
                .unwrap_or_else(|| next_start(latest.get(&country.name).copied(), default_start));

            let plan = match FetchWindow::new(start, end) {
                Some(window) => CountryPlan::Fetch(window),
                None => CountryPlan::AlreadyCurrent { next_start: start },
            };
            (country.clone(), plan)
        })
        .collect()
}

/// Last day a run should ingest. Today is left out when `exclude_today` is
/// set, since its data is still incomplete.
pub fn resolve_end_date(today: NaiveDate, explicit: Option<NaiveDate>, exclude_today: bool) -> NaiveDate {
    match explicit {
        Some(end) => end,
        None if exclude_today => today.checked_sub_days(Days::new(1)).unwrap_or(today),
        None => today,
    }
}
