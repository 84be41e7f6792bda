// Operator-facing run summaries
use crate::application::coverage_service::{CoverageReference, CoverageReport};
use crate::application::ingest_service::{CountryOutcome, RunOutcome, RunReport};
use crate::domain::generation::FuelValues;
use crate::domain::validation::ValidationWarning;

pub fn log_run_report(report: &RunReport) {
    for country in &report.countries {
        match &country.outcome {
            CountryOutcome::Updated { days } => {
                tracing::info!(country = %country.country, "[OK] Downloaded {} days of data", days)
            }
            CountryOutcome::Partial { days, reason } => tracing::warn!(
                country = %country.country,
                "[PARTIAL] Kept {} days, stopped early: {}",
                days,
                reason
            ),
            CountryOutcome::AlreadyCurrent => {
                tracing::info!(country = %country.country, "[SKIP] Already up to date")
            }
            CountryOutcome::NoData => {
                tracing::info!(country = %country.country, "[SKIP] No data available")
            }
            CountryOutcome::Failed { reason } => {
                tracing::error!(country = %country.country, "[FAIL] {}", reason)
            }
        }
    }

    if !report.warnings.is_empty() {
        tracing::warn!("{} data quality warning(s) this run", report.warnings.len());
    }

    match &report.outcome {
        RunOutcome::UpToDate { rows } => {
            tracing::info!("Data is already up to date ({} rows)", rows);
        }
        RunOutcome::Saved {
            rows,
            inserted,
            replaced,
            date_range,
            countries,
        } => {
            tracing::info!(
                "[SUCCESS] Saved {} total rows ({} new, {} replaced)",
                rows,
                inserted,
                replaced
            );
            if let Some((first, last)) = date_range {
                tracing::info!("Date range: {} to {}, countries: {}", first, last, countries);
            }
        }
    }
}

pub fn log_validation(warnings: &[ValidationWarning]) {
    if warnings.is_empty() {
        tracing::info!("No data quality issues found");
        return;
    }
    for warning in warnings {
        tracing::warn!("{}", warning);
    }
    tracing::warn!("{} data quality warning(s)", warnings.len());
}

pub fn log_emission_totals(days: usize, totals: &FuelValues) {
    tracing::info!("Total days: {}", days);
    tracing::info!(
        "Total emissions (kt CO2): lignite {:.2}, hard coal {:.2}, gas {:.2}, total {:.2}",
        totals.lignite,
        totals.hard_coal,
        totals.gas,
        totals.total()
    );
}

pub fn log_coverage(report: &CoverageReport, reference: &CoverageReference) {
    tracing::info!("--- {} generation for tracked countries ---", report.year);
    tracing::info!("Lignite:    {:.2} TWh", report.lignite_twh);
    tracing::info!("Hard coal:  {:.2} TWh", report.hard_coal_twh);
    tracing::info!("Total coal: {:.2} TWh", report.coal_twh());
    tracing::info!("Gas:        {:.2} TWh", report.gas_twh);
    tracing::info!(
        "Coal coverage: {:.1}% ({:.1}/{} TWh)",
        report.coal_coverage_pct,
        report.coal_twh(),
        reference.coal_twh
    );
    tracing::info!(
        "Gas coverage:  {:.1}% ({:.1}/{} TWh)",
        report.gas_coverage_pct,
        report.gas_twh,
        reference.gas_twh
    );
}
