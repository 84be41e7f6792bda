// Emission estimate domain models
use super::generation::FuelValues;
use chrono::NaiveDate;
use serde::Deserialize;

/// kt CO2 emitted per GWh generated, per fuel.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EmissionFactors {
    pub lignite: f64,
    pub hard_coal: f64,
    pub gas: f64,
}

impl EmissionFactors {
    pub fn as_values(&self) -> FuelValues {
        FuelValues::new(self.lignite, self.hard_coal, self.gas)
    }
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self {
            lignite: 1.1,
            hard_coal: 0.85,
            gas: 0.4,
        }
    }
}

/// CO2 estimate for one date, summed across all countries.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyEmissions {
    pub date: NaiveDate,
    pub co2_kt: FuelValues,
}

impl DailyEmissions {
    pub fn total_kt(&self) -> f64 {
        self.co2_kt.total()
    }
}
