// CSV persistence for the daily dataset and emission estimates
use crate::application::dataset_repository::DatasetRepository;
use crate::domain::dataset::{DailyRecord, HistoricalDataset};
use crate::domain::emissions::DailyEmissions;
use crate::domain::generation::{Fuel, FuelValues};
use crate::error::{PipelineError, PipelineResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
struct DatasetRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Lignite_GWh")]
    lignite_gwh: f64,
    #[serde(rename = "Hard_Coal_GWh")]
    hard_coal_gwh: f64,
    #[serde(rename = "Gas_GWh")]
    gas_gwh: f64,
    // Read for shape only; always recomputed from the fuel columns
    #[serde(rename = "Total_Fossil_GWh", default)]
    total_fossil_gwh: Option<f64>,
}

#[derive(Debug, Serialize)]
struct EmissionsRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "CO2_Lignite_kt")]
    lignite_kt: f64,
    #[serde(rename = "CO2_Hard_Coal_kt")]
    hard_coal_kt: f64,
    #[serde(rename = "CO2_Gas_kt")]
    gas_kt: f64,
    #[serde(rename = "Total_CO2_kt")]
    total_kt: f64,
}

impl From<&DailyRecord> for DatasetRow {
    fn from(record: &DailyRecord) -> Self {
        Self {
            date: record.date,
            country: record.country.clone(),
            lignite_gwh: record.energy_gwh.lignite,
            hard_coal_gwh: record.energy_gwh.hard_coal,
            gas_gwh: record.energy_gwh.gas,
            total_fossil_gwh: Some(record.total_fossil_gwh()),
        }
    }
}

impl DatasetRow {
    fn into_record(self, line: u64) -> PipelineResult<DailyRecord> {
        let energy = FuelValues::new(self.lignite_gwh, self.hard_coal_gwh, self.gas_gwh);
        for fuel in Fuel::ALL {
            let value = energy.get(fuel);
            if !value.is_finite() || value < 0.0 {
                return Err(PipelineError::InvalidRow {
                    line,
                    reason: format!("{fuel} value {value} is not a non-negative number"),
                });
            }
        }
        Ok(DailyRecord::new(self.date, self.country, energy))
    }
}

/// The dataset as one CSV file, rewritten in full on save.
#[derive(Debug, Clone)]
pub struct CsvDatasetRepository {
    path: PathBuf,
}

impl CsvDatasetRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetRepository for CsvDatasetRepository {
    fn load(&self) -> PipelineResult<HistoricalDataset> {
        if !self.path.exists() {
            tracing::info!("No dataset at {}, starting empty", self.path.display());
            return Ok(HistoricalDataset::empty());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let headers = reader.headers()?.clone();
        let mut raw = csv::StringRecord::new();
        let mut records = Vec::new();

        while reader.read_record(&mut raw)? {
            let line = raw.position().map(|p| p.line()).unwrap_or_default();
            let row: DatasetRow = raw.deserialize(Some(&headers))?;
            records.push(row.into_record(line)?);
        }

        Ok(HistoricalDataset::from_records(records))
    }

    fn save(&self, dataset: &HistoricalDataset) -> PipelineResult<()> {
        let rows = dataset.records().iter().map(DatasetRow::from);
        write_atomically(&self.path, rows)?;
        tracing::info!("Wrote {} rows to {}", dataset.len(), self.path.display());
        Ok(())
    }
}

/// Write the emission estimates, one row per date.
pub fn write_emissions(path: &Path, emissions: &[DailyEmissions]) -> PipelineResult<()> {
    let rows = emissions.iter().map(|day| EmissionsRow {
        date: day.date,
        lignite_kt: day.co2_kt.lignite,
        hard_coal_kt: day.co2_kt.hard_coal,
        gas_kt: day.co2_kt.gas,
        total_kt: day.total_kt(),
    });
    write_atomically(path, rows)
}

/// Serialize rows into a sibling temp file, then rename it over `path`.
fn write_atomically<T: Serialize>(path: &Path, rows: impl Iterator<Item = T>) -> PipelineResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    {
        let mut writer = csv::Writer::from_path(&tmp_path)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }

    fs::rename(&tmp_path, path)?;
    Ok(())
}
