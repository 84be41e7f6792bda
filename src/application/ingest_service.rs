// Ingest service - One incremental update run across all tracked countries
use crate::application::daily_aggregator::aggregate_daily;
use crate::application::data_validator::validate_series;
use crate::application::dataset_repository::DatasetRepository;
use crate::application::generation_source::GenerationSource;
use crate::application::incremental_merger::{merge, MergeOutcome};
use crate::application::interval_normalizer::normalize;
use crate::application::resume_tracker::{load_history, plan_windows, CountryPlan};
use crate::domain::country::Country;
use crate::domain::dataset::DailyRecord;
use crate::domain::validation::ValidationWarning;
use crate::domain::window::FetchWindow;
use anyhow::Context;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

/// Extra days requested on each side of a window. Upstream dates are local
/// calendar days, records are grouped by UTC date.
const FETCH_PADDING_DAYS: u64 = 1;

#[derive(Debug, Clone, PartialEq)]
pub enum CountryOutcome {
    Updated { days: usize },
    /// Some year chunks were fetched before one failed
    Partial { days: usize, reason: String },
    AlreadyCurrent,
    NoData,
    Failed { reason: String },
}

#[derive(Debug, Clone)]
pub struct CountryReport {
    pub country: String,
    pub outcome: CountryOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    UpToDate {
        rows: usize,
    },
    Saved {
        rows: usize,
        inserted: usize,
        replaced: usize,
        date_range: Option<(NaiveDate, NaiveDate)>,
        countries: usize,
    },
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub countries: Vec<CountryReport>,
    pub warnings: Vec<ValidationWarning>,
    pub outcome: RunOutcome,
}

#[derive(Debug, Clone, Copy)]
pub struct IngestRequest {
    pub end: NaiveDate,
    pub forced_start: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct IngestService {
    source: Arc<dyn GenerationSource>,
    repository: Arc<dyn DatasetRepository>,
    countries: Vec<Country>,
    default_start: NaiveDate,
    request_delay: Duration,
}

/// Records fetched for one country plus how the fetch went.
struct CountryFetch {
    records: Vec<DailyRecord>,
    failure: Option<String>,
}

impl IngestService {
    pub fn new(
        source: Arc<dyn GenerationSource>,
        repository: Arc<dyn DatasetRepository>,
        countries: Vec<Country>,
        default_start: NaiveDate,
        request_delay: Duration,
    ) -> Self {
        Self {
            source,
            repository,
            countries,
            default_start,
            request_delay,
        }
    }

    pub async fn run(&self, request: IngestRequest) -> anyhow::Result<RunReport> {
        let history = load_history(self.repository.as_ref());
        tracing::info!("Loaded {} existing rows", history.len());

        let plans = plan_windows(
            &self.countries,
            &history,
            self.default_start,
            request.end,
            request.forced_start,
        );

        let mut reports = Vec::with_capacity(plans.len());
        let mut warnings = Vec::new();
        let mut new_records = Vec::new();
        let mut requests_sent = 0usize;

        for (country, plan) in plans {
            let window = match plan {
                CountryPlan::Fetch(window) => window,
                CountryPlan::AlreadyCurrent { next_start } => {
                    tracing::info!(country = %country.name, %next_start, "Already current, skipping");
                    reports.push(CountryReport {
                        country: country.name,
                        outcome: CountryOutcome::AlreadyCurrent,
                    });
                    continue;
                }
            };

            tracing::info!(country = %country.name, %window, "Processing");
            let fetch = self.fetch_country(&country, window, &mut requests_sent).await;

            let country_warnings = validate_series(&country.name, &fetch.records);
            for warning in &country_warnings {
                tracing::warn!(country = %country.name, "{}", warning);
            }
            warnings.extend(country_warnings);

            let days = fetch.records.len();
            let outcome = match (days, fetch.failure) {
                (0, Some(reason)) => CountryOutcome::Failed { reason },
                (days, Some(reason)) => CountryOutcome::Partial { days, reason },
                (0, None) => CountryOutcome::NoData,
                (days, None) => CountryOutcome::Updated { days },
            };
            new_records.extend(fetch.records);
            reports.push(CountryReport {
                country: country.name,
                outcome,
            });
        }

        let outcome = match merge(&history, new_records) {
            MergeOutcome::UpToDate => {
                tracing::info!("No new data was added, dataset already up to date");
                RunOutcome::UpToDate {
                    rows: history.len(),
                }
            }
            MergeOutcome::Merged {
                dataset,
                inserted,
                replaced,
            } => {
                self.repository
                    .save(&dataset)
                    .context("Failed to save merged dataset")?;
                tracing::info!(
                    "Saved {} rows ({} new, {} replaced)",
                    dataset.len(),
                    inserted,
                    replaced
                );
                RunOutcome::Saved {
                    rows: dataset.len(),
                    inserted,
                    replaced,
                    date_range: dataset.date_range(),
                    countries: dataset.countries().len(),
                }
            }
        };

        Ok(RunReport {
            countries: reports,
            warnings,
            outcome,
        })
    }

    /// Fetch a country one calendar year at a time. The first failed chunk
    /// stops the country; chunks fetched before it are kept.
    async fn fetch_country(
        &self,
        country: &Country,
        window: FetchWindow,
        requests_sent: &mut usize,
    ) -> CountryFetch {
        let mut samples = Vec::new();
        let mut failure = None;

        for chunk in window.padded(FETCH_PADDING_DAYS).year_chunks() {
            if *requests_sent > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
            *requests_sent += 1;

            match self.source.fetch_samples(country, chunk).await {
                Ok(mut chunk_samples) => {
                    tracing::debug!(
                        country = %country.name,
                        "Fetched {} samples for {}",
                        chunk_samples.len(),
                        chunk
                    );
                    samples.append(&mut chunk_samples);
                }
                Err(e) => {
                    tracing::error!(country = %country.name, "Fetch failed for {}: {}", chunk, e);
                    failure = Some(e.to_string());
                    break;
                }
            }
        }

        let energy = normalize(samples);
        let covered_hours: f64 = energy.iter().map(|e| e.interval_hours).sum();
        tracing::debug!(
            country = %country.name,
            "Normalized {} samples covering {:.1} hours",
            energy.len(),
            covered_hours
        );

        // Padding days and today's partial day fall outside the window
        let records: Vec<DailyRecord> = aggregate_daily(&country.name, &energy)
            .into_iter()
            .filter(|r| window.contains(r.date))
            .collect();

        CountryFetch { records, failure }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::HistoricalDataset;
    use crate::domain::generation::{FuelValues, Sample};
    use crate::error::{PipelineError, PipelineResult};
    use crate::infrastructure::csv_store::CsvDatasetRepository;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves a constant hourly gas level per country, or fails for listed codes.
    struct FakeSource {
        gas_mw: HashMap<String, f64>,
        failing: Vec<String>,
        calls: Mutex<Vec<(String, FetchWindow)>>,
    }

    impl FakeSource {
        fn new(gas_mw: &[(&str, f64)], failing: &[&str]) -> Self {
            Self {
                gas_mw: gas_mw.iter().map(|(c, v)| (c.to_string(), *v)).collect(),
                failing: failing.iter().map(|c| c.to_string()).collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GenerationSource for FakeSource {
        async fn fetch_samples(&self, country: &Country, window: FetchWindow) -> PipelineResult<Vec<Sample>> {
            self.calls.lock().unwrap().push((country.code.clone(), window));

            if self.failing.contains(&country.code) {
                return Err(PipelineError::MalformedPayload("boom".to_string()));
            }

            let gas = self.gas_mw.get(&country.code).copied().unwrap_or(0.0);
            // Hourly readings over the window plus one extra day past its end
            let first: DateTime<Utc> = Utc.from_utc_datetime(&window.start.and_hms_opt(0, 0, 0).unwrap());
            let hours = ((window.end - window.start).num_days() + 2) * 24;
            Ok((0..hours)
                .map(|h| Sample::new(first + chrono::Duration::hours(h), FuelValues::new(0.0, 0.0, gas)))
                .collect())
        }
    }

    #[derive(Default)]
    struct MemoryRepository {
        dataset: Mutex<Option<HistoricalDataset>>,
        saves: Mutex<usize>,
    }

    impl DatasetRepository for MemoryRepository {
        fn load(&self) -> PipelineResult<HistoricalDataset> {
            Ok(self.dataset.lock().unwrap().clone().unwrap_or_default())
        }

        fn save(&self, dataset: &HistoricalDataset) -> PipelineResult<()> {
            *self.dataset.lock().unwrap() = Some(dataset.clone());
            *self.saves.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn service(source: Arc<FakeSource>, repository: Arc<MemoryRepository>) -> IngestService {
        IngestService::new(
            source,
            repository,
            vec![Country::new("Germany", "de"), Country::new("France", "fr")],
            date(1, 1),
            Duration::ZERO,
        )
    }

    #[tokio::test]
    async fn test_first_run_backfills_from_default_start() {
        let source = Arc::new(FakeSource::new(&[("de", 1000.0), ("fr", 500.0)], &[]));
        let repository = Arc::new(MemoryRepository::default());

        let report = service(source, repository.clone())
            .run(IngestRequest { end: date(1, 3), forced_start: None })
            .await
            .unwrap();

        let dataset = repository.load().unwrap();
        assert_eq!(dataset.len(), 6);
        assert_eq!(dataset.get(date(1, 3), "Germany").unwrap().energy_gwh.gas, 24.0);
        assert_eq!(dataset.get(date(1, 2), "France").unwrap().energy_gwh.gas, 12.0);
        // The extra day served past the window end is dropped
        assert!(dataset.get(date(1, 4), "Germany").is_none());
        assert_eq!(report.countries[0].outcome, CountryOutcome::Updated { days: 3 });
        assert!(matches!(report.outcome, RunOutcome::Saved { rows: 6, inserted: 6, replaced: 0, .. }));
    }

    #[tokio::test]
    async fn test_second_run_resumes_per_country() {
        let source = Arc::new(FakeSource::new(&[("de", 1000.0), ("fr", 500.0)], &[]));
        let repository = Arc::new(MemoryRepository::default());
        *repository.dataset.lock().unwrap() = Some(HistoricalDataset::from_records(vec![
            DailyRecord::new(date(1, 5), "Germany", FuelValues::new(1.0, 1.0, 1.0)),
            DailyRecord::new(date(1, 2), "France", FuelValues::new(1.0, 1.0, 1.0)),
        ]));

        service(source.clone(), repository)
            .run(IngestRequest { end: date(1, 5), forced_start: None })
            .await
            .unwrap();

        let calls = source.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![("fr".to_string(), FetchWindow::new(date(1, 2), date(1, 6)).unwrap())]
        );
    }

    #[tokio::test]
    async fn test_everything_current_skips_save() {
        let source = Arc::new(FakeSource::new(&[], &[]));
        let repository = Arc::new(MemoryRepository::default());
        *repository.dataset.lock().unwrap() = Some(HistoricalDataset::from_records(vec![
            DailyRecord::new(date(1, 5), "Germany", FuelValues::default()),
            DailyRecord::new(date(1, 5), "France", FuelValues::default()),
        ]));

        let report = service(source.clone(), repository.clone())
            .run(IngestRequest { end: date(1, 5), forced_start: None })
            .await
            .unwrap();

        assert_eq!(report.outcome, RunOutcome::UpToDate { rows: 2 });
        assert_eq!(*repository.saves.lock().unwrap(), 0);
        assert!(source.calls.lock().unwrap().is_empty());
        assert!(report
            .countries
            .iter()
            .all(|c| c.outcome == CountryOutcome::AlreadyCurrent));
    }

    #[tokio::test]
    async fn test_failed_country_does_not_block_others() {
        let source = Arc::new(FakeSource::new(&[("fr", 500.0)], &["de"]));
        let repository = Arc::new(MemoryRepository::default());

        let report = service(source, repository.clone())
            .run(IngestRequest { end: date(1, 2), forced_start: None })
            .await
            .unwrap();

        assert!(matches!(report.countries[0].outcome, CountryOutcome::Failed { .. }));
        assert_eq!(report.countries[1].outcome, CountryOutcome::Updated { days: 2 });

        let dataset = repository.load().unwrap();
        assert_eq!(dataset.countries().into_iter().collect::<Vec<_>>(), vec!["France"]);
    }

    #[tokio::test]
    async fn test_corrected_day_replaces_previous_value() {
        let repository = Arc::new(MemoryRepository::default());

        let first = Arc::new(FakeSource::new(&[("de", 1000.0), ("fr", 0.0)], &[]));
        service(first, repository.clone())
            .run(IngestRequest { end: date(1, 2), forced_start: None })
            .await
            .unwrap();

        let second = Arc::new(FakeSource::new(&[("de", 2000.0), ("fr", 0.0)], &[]));
        let report = service(second, repository.clone())
            .run(IngestRequest { end: date(1, 2), forced_start: Some(date(1, 2)) })
            .await
            .unwrap();

        let dataset = repository.load().unwrap();
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.get(date(1, 1), "Germany").unwrap().energy_gwh.gas, 24.0);
        assert_eq!(dataset.get(date(1, 2), "Germany").unwrap().energy_gwh.gas, 48.0);
        assert!(matches!(report.outcome, RunOutcome::Saved { inserted: 0, replaced: 2, .. }));
    }

    #[tokio::test]
    async fn test_long_window_is_fetched_per_year() {
        let source = Arc::new(FakeSource::new(&[("de", 100.0)], &[]));
        let repository = Arc::new(MemoryRepository::default());
        let service = IngestService::new(
            source.clone(),
            repository,
            vec![Country::new("Germany", "de")],
            NaiveDate::from_ymd_opt(2023, 12, 30).unwrap(),
            Duration::ZERO,
        );

        service
            .run(IngestRequest { end: date(1, 2), forced_start: None })
            .await
            .unwrap();

        let windows: Vec<FetchWindow> = source.calls.lock().unwrap().iter().map(|(_, w)| *w).collect();
        assert_eq!(
            windows,
            vec![
                FetchWindow::new(NaiveDate::from_ymd_opt(2023, 12, 29).unwrap(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()).unwrap(),
                FetchWindow::new(date(1, 1), date(1, 3)).unwrap(),
            ]
        );
    }

    /// Hourly readings for whole local (UTC+1) calendar days, the way the
    /// upstream interprets requested dates.
    struct LocalDaySource {
        gas_mw: f64,
    }

    #[async_trait]
    impl GenerationSource for LocalDaySource {
        async fn fetch_samples(&self, _country: &Country, window: FetchWindow) -> PipelineResult<Vec<Sample>> {
            let local_midnight = Utc.from_utc_datetime(&window.start.and_hms_opt(0, 0, 0).unwrap())
                - chrono::Duration::hours(1);
            let hours = ((window.end - window.start).num_days() + 1) * 24;
            Ok((0..hours)
                .map(|h| {
                    Sample::new(
                        local_midnight + chrono::Duration::hours(h),
                        FuelValues::new(0.0, 0.0, self.gas_mw),
                    )
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_utc_days_are_complete_across_runs() {
        let source = Arc::new(LocalDaySource { gas_mw: 1000.0 });
        let repository = Arc::new(MemoryRepository::default());
        let service = IngestService::new(
            source,
            repository.clone(),
            vec![Country::new("Germany", "de")],
            date(1, 1),
            Duration::ZERO,
        );

        service
            .run(IngestRequest { end: date(1, 2), forced_start: None })
            .await
            .unwrap();
        service
            .run(IngestRequest { end: date(1, 4), forced_start: None })
            .await
            .unwrap();

        let dataset = repository.load().unwrap();
        assert_eq!(dataset.len(), 4);
        for day in 1..=4 {
            assert_eq!(dataset.get(date(1, day), "Germany").unwrap().energy_gwh.gas, 24.0);
        }
    }

    #[tokio::test]
    async fn test_negative_readings_survive_a_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let repository = Arc::new(CsvDatasetRepository::new(dir.path().join("fossil.csv")));
        let countries = vec![Country::new("Germany", "de"), Country::new("Poland", "pl")];

        let first = Arc::new(FakeSource::new(&[("de", 1000.0), ("pl", 500.0)], &[]));
        IngestService::new(first, repository.clone(), countries.clone(), date(1, 1), Duration::ZERO)
            .run(IngestRequest { end: date(1, 3), forced_start: None })
            .await
            .unwrap();

        let negative = Arc::new(FakeSource::new(&[("de", 1000.0), ("pl", -0.5)], &[]));
        IngestService::new(negative, repository.clone(), countries.clone(), date(1, 1), Duration::ZERO)
            .run(IngestRequest { end: date(1, 5), forced_start: None })
            .await
            .unwrap();

        let dataset = repository.load().unwrap();
        assert_eq!(dataset.len(), 10);
        assert_eq!(dataset.get(date(1, 5), "Poland").unwrap().energy_gwh.gas, 0.0);

        // A later failing run must not lose Poland's history
        let failing = Arc::new(FakeSource::new(&[("de", 1000.0)], &["pl"]));
        IngestService::new(failing, repository.clone(), countries, date(1, 1), Duration::ZERO)
            .run(IngestRequest { end: date(1, 6), forced_start: None })
            .await
            .unwrap();

        let dataset = repository.load().unwrap();
        assert_eq!(dataset.series_for("Poland").len(), 5);
        assert_eq!(dataset.get(date(1, 2), "Poland").unwrap().energy_gwh.gas, 12.0);
    }
}
