// Emissions service - Daily CO2 estimates from the generation dataset
use crate::domain::dataset::HistoricalDataset;
use crate::domain::emissions::{DailyEmissions, EmissionFactors};
use crate::domain::generation::FuelValues;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Sum generation per date across countries and apply the factors.
pub fn daily_emissions(dataset: &HistoricalDataset, factors: &EmissionFactors) -> Vec<DailyEmissions> {
    let mut gwh_by_date: BTreeMap<NaiveDate, FuelValues> = BTreeMap::new();
    for record in dataset.records() {
        gwh_by_date
            .entry(record.date)
            .or_default()
            .add(&record.energy_gwh);
    }

    let factors = factors.as_values();
    gwh_by_date
        .into_iter()
        .map(|(date, gwh)| DailyEmissions {
            date,
            co2_kt: FuelValues::new(
                gwh.lignite * factors.lignite,
                gwh.hard_coal * factors.hard_coal,
                gwh.gas * factors.gas,
            ),
        })
        .collect()
}

/// Per-fuel totals over a set of daily estimates.
pub fn total_emissions(emissions: &[DailyEmissions]) -> FuelValues {
    let mut total = FuelValues::default();
    for day in emissions {
        total.add(&day.co2_kt);
    }
    total
}
