// Coverage service - Compares a year's tracked generation with EU-wide totals
use crate::domain::dataset::HistoricalDataset;
use crate::domain::generation::FuelValues;
use chrono::Datelike;
use serde::Deserialize;

const GWH_PER_TWH: f64 = 1000.0;

/// EU-27 reference generation for the coverage comparison.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CoverageReference {
    pub coal_twh: f64,
    pub gas_twh: f64,
}

impl Default for CoverageReference {
    fn default() -> Self {
        // Ember European Electricity Review 2024, EU-27 2023 totals
        Self {
            coal_twh: 333.0,
            gas_twh: 452.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoverageReport {
    pub year: i32,
    pub lignite_twh: f64,
    pub hard_coal_twh: f64,
    pub gas_twh: f64,
    pub coal_coverage_pct: f64,
    pub gas_coverage_pct: f64,
}

impl CoverageReport {
    pub fn coal_twh(&self) -> f64 {
        self.lignite_twh + self.hard_coal_twh
    }
}

/// `None` when the dataset holds nothing for `year`.
pub fn coverage_for_year(
    dataset: &HistoricalDataset,
    year: i32,
    reference: &CoverageReference,
) -> Option<CoverageReport> {
    let mut total_gwh = FuelValues::default();
    let mut matched = 0usize;

    for record in dataset.records().iter().filter(|r| r.date.year() == year) {
        total_gwh.add(&record.energy_gwh);
        matched += 1;
    }

    if matched == 0 {
        return None;
    }

    let lignite_twh = total_gwh.lignite / GWH_PER_TWH;
    let hard_coal_twh = total_gwh.hard_coal / GWH_PER_TWH;
    let gas_twh = total_gwh.gas / GWH_PER_TWH;

    Some(CoverageReport {
        year,
        lignite_twh,
        hard_coal_twh,
        gas_twh,
        coal_coverage_pct: (lignite_twh + hard_coal_twh) / reference.coal_twh * 100.0,
        gas_coverage_pct: gas_twh / reference.gas_twh * 100.0,
    })
}
