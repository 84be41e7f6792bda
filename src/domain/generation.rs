// Generation domain models - fuels, power samples and energy samples
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fuel {
    Lignite,
    HardCoal,
    Gas,
}

impl Fuel {
    pub const ALL: [Fuel; 3] = [Fuel::Lignite, Fuel::HardCoal, Fuel::Gas];

    pub fn label(self) -> &'static str {
        match self {
            Fuel::Lignite => "lignite",
            Fuel::HardCoal => "hard coal",
            Fuel::Gas => "gas",
        }
    }
}

impl fmt::Display for Fuel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per tracked fuel. A fuel that was never set reads as zero, so
/// callers never have to care whether the upstream sent a series for it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FuelValues {
    pub lignite: f64,
    pub hard_coal: f64,
    pub gas: f64,
}

impl FuelValues {
    pub fn new(lignite: f64, hard_coal: f64, gas: f64) -> Self {
        Self {
            lignite,
            hard_coal,
            gas,
        }
    }

    pub fn get(&self, fuel: Fuel) -> f64 {
        match fuel {
            Fuel::Lignite => self.lignite,
            Fuel::HardCoal => self.hard_coal,
            Fuel::Gas => self.gas,
        }
    }

    pub fn set(&mut self, fuel: Fuel, value: f64) {
        match fuel {
            Fuel::Lignite => self.lignite = value,
            Fuel::HardCoal => self.hard_coal = value,
            Fuel::Gas => self.gas = value,
        }
    }

    pub fn total(&self) -> f64 {
        self.lignite + self.hard_coal + self.gas
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self::new(
            self.lignite * factor,
            self.hard_coal * factor,
            self.gas * factor,
        )
    }

    pub fn add(&mut self, other: &FuelValues) {
        self.lignite += other.lignite;
        self.hard_coal += other.hard_coal;
        self.gas += other.gas;
    }

    /// Negative and NaN values become zero.
    pub fn clamped_non_negative(&self) -> Self {
        Self::new(
            non_negative(self.lignite),
            non_negative(self.hard_coal),
            non_negative(self.gas),
        )
    }
}

pub fn non_negative(value: f64) -> f64 {
    if value > 0.0 { value } else { 0.0 }
}

/// Instantaneous power reading (MW per fuel) at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub power_mw: FuelValues,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, power_mw: FuelValues) -> Self {
        Self {
            timestamp,
            power_mw,
        }
    }
}

/// Energy attributed to one sample after interval inference.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergySample {
    pub timestamp: DateTime<Utc>,
    pub interval_hours: f64,
    pub energy_mwh: FuelValues,
}
