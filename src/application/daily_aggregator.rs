// Daily aggregator - Sums per-sample energy into one record per calendar day
use crate::domain::dataset::DailyRecord;
use crate::domain::generation::{EnergySample, FuelValues};
use chrono::NaiveDate;
use std::collections::BTreeMap;

const MWH_PER_GWH: f64 = 1000.0;

/// One record per calendar date (UTC) that has at least one sample, sorted
/// by date. Days without samples produce no record.
pub fn aggregate_daily(country: &str, samples: &[EnergySample]) -> Vec<DailyRecord> {
    let mut by_date: BTreeMap<NaiveDate, FuelValues> = BTreeMap::new();

    for sample in samples {
        by_date
            .entry(sample.timestamp.date_naive())
            .or_default()
            .add(&sample.energy_mwh);
    }

    by_date
        .into_iter()
        .map(|(date, mwh)| {
            // Stored records must stay non-negative to be readable again
            let gwh = FuelValues::new(
                mwh.lignite / MWH_PER_GWH,
                mwh.hard_coal / MWH_PER_GWH,
                mwh.gas / MWH_PER_GWH,
            )
            .clamped_non_negative();
            DailyRecord::new(date, country, gwh)
        })
        .collect()
}
