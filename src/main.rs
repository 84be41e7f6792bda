// Main entry point - Configuration, wiring and command dispatch
mod application;
mod domain;
mod error;
mod infrastructure;
mod presentation;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::application::coverage_service::coverage_for_year;
use crate::application::data_validator::validate_dataset;
use crate::application::dataset_repository::DatasetRepository;
use crate::application::emissions_service::{daily_emissions, total_emissions};
use crate::application::ingest_service::{IngestRequest, IngestService};
use crate::application::resume_tracker::resolve_end_date;
use crate::infrastructure::config::{load_pipeline_config, PipelineConfig};
use crate::infrastructure::csv_store::{write_emissions, CsvDatasetRepository};
use crate::infrastructure::energy_charts_client::EnergyChartsClient;
use crate::presentation::cli::{Cli, Command};
use crate::presentation::report;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = load_pipeline_config().context("Failed to load pipeline configuration")?;

    match cli.command {
        Command::Update { start, end, output } => {
            let dataset_path = output.unwrap_or_else(|| config.storage.dataset_path.clone());
            run_update(&config, dataset_path, start, end).await?;
        }
        Command::Validate { input } => {
            let dataset = load_dataset(&config, input)?;
            report::log_validation(&validate_dataset(&dataset));
        }
        Command::Emissions { input, output } => {
            let dataset = load_dataset(&config, input)?;
            let emissions = daily_emissions(&dataset, &config.emission_factors);
            let output = output.unwrap_or_else(|| config.storage.emissions_path.clone());

            write_emissions(&output, &emissions)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!("[SUCCESS] Saved CO2 emissions to {}", output.display());
            report::log_emission_totals(emissions.len(), &total_emissions(&emissions));
        }
        Command::Coverage { year, input } => {
            let dataset = load_dataset(&config, input)?;
            match coverage_for_year(&dataset, year, &config.coverage_reference) {
                Some(coverage) => report::log_coverage(&coverage, &config.coverage_reference),
                None => tracing::warn!("No data for {} found", year),
            }
        }
    }

    Ok(())
}

async fn run_update(
    config: &PipelineConfig,
    dataset_path: PathBuf,
    start: Option<chrono::NaiveDate>,
    end: Option<chrono::NaiveDate>,
) -> anyhow::Result<()> {
    // Create adapters (infrastructure layer)
    let repository = Arc::new(CsvDatasetRepository::new(dataset_path));
    let source = Arc::new(EnergyChartsClient::new(
        &config.upstream.base_url,
        config.upstream.request_timeout(),
        config.fuel_table(),
    )?);

    // Create service (application layer)
    let service = IngestService::new(
        source,
        repository.clone(),
        config.countries.clone(),
        config.schedule.default_start_date,
        config.upstream.request_delay(),
    );

    let today = chrono::Local::now().date_naive();
    let end = resolve_end_date(today, end, config.schedule.exclude_today);
    tracing::info!(
        "Updating {} through {} ({} countries)",
        repository.path().display(),
        end,
        config.countries.len()
    );

    let run_report = service
        .run(IngestRequest {
            end,
            forced_start: start,
        })
        .await?;
    report::log_run_report(&run_report);

    Ok(())
}

fn load_dataset(
    config: &PipelineConfig,
    input: Option<PathBuf>,
) -> anyhow::Result<crate::domain::dataset::HistoricalDataset> {
    let path = input.unwrap_or_else(|| config.storage.dataset_path.clone());
    let repository = CsvDatasetRepository::new(&path);
    let dataset = repository
        .load()
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;
    if dataset.is_empty() {
        tracing::warn!("Dataset {} is empty", path.display());
    } else {
        tracing::info!("Loaded {} rows from {}", dataset.len(), path.display());
    }
    Ok(dataset)
}
