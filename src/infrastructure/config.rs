use crate::application::coverage_service::CoverageReference;
use crate::domain::country::{Country, FuelNameTable};
use crate::domain::emissions::EmissionFactors;
use crate::domain::generation::Fuel;
use chrono::NaiveDate;
use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    pub upstream: UpstreamSettings,
    pub storage: StorageSettings,
    pub schedule: ScheduleSettings,
    #[serde(default = "default_countries")]
    pub countries: Vec<Country>,
    #[serde(default = "default_fuel_names")]
    pub fuel_names: Vec<FuelNameConfig>,
    #[serde(default)]
    pub emission_factors: EmissionFactors,
    #[serde(default)]
    pub coverage_reference: CoverageReference,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSettings {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub request_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub dataset_path: PathBuf,
    pub emissions_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScheduleSettings {
    pub default_start_date: NaiveDate,
    pub exclude_today: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FuelNameConfig {
    pub production_type: String,
    pub fuel: Fuel,
}

impl UpstreamSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl PipelineConfig {
    pub fn fuel_table(&self) -> FuelNameTable {
        let names: HashMap<String, Fuel> = self
            .fuel_names
            .iter()
            .map(|entry| (entry.production_type.clone(), entry.fuel))
            .collect();
        FuelNameTable::new(names)
    }
}

fn default_countries() -> Vec<Country> {
    [
        ("Germany", "de"),
        ("France", "fr"),
        ("Italy", "it"),
        ("Spain", "es"),
        ("Poland", "pl"),
        ("Netherlands", "nl"),
        ("Belgium", "be"),
        ("Sweden", "se"),
        ("Austria", "at"),
        ("Czech Republic", "cz"),
        ("Romania", "ro"),
    ]
    .into_iter()
    .map(|(name, code)| Country::new(name, code))
    .collect()
}

fn default_fuel_names() -> Vec<FuelNameConfig> {
    [
        ("Fossil brown coal / lignite", Fuel::Lignite),
        ("Fossil hard coal", Fuel::HardCoal),
        ("Fossil gas", Fuel::Gas),
    ]
    .into_iter()
    .map(|(production_type, fuel)| FuelNameConfig {
        production_type: production_type.to_string(),
        fuel,
    })
    .collect()
}

fn builder_with_defaults() -> anyhow::Result<ConfigBuilder<DefaultState>> {
    Ok(config::Config::builder()
        .set_default("upstream.base_url", "https://api.energy-charts.info")?
        .set_default("upstream.request_timeout_secs", 60_i64)?
        .set_default("upstream.request_delay_ms", 500_i64)?
        .set_default("storage.dataset_path", "eu_generation_daily.csv")?
        .set_default("storage.emissions_path", "eu_co2_daily.csv")?
        .set_default("schedule.default_start_date", "2023-01-01")?
        .set_default("schedule.exclude_today", true)?)
}

/// Built-in defaults, overridden by `config/pipeline.*` when present, then by
/// `CO2_PIPELINE__SECTION__KEY` environment variables.
pub fn load_pipeline_config() -> anyhow::Result<PipelineConfig> {
    let settings = builder_with_defaults()?
        .add_source(config::File::with_name("config/pipeline").required(false))
        .add_source(
            config::Environment::with_prefix("CO2_PIPELINE")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
