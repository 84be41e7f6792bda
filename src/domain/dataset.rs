// Daily record and historical dataset domain models
use super::generation::{Fuel, FuelValues};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Natural key of a daily record.
pub type RecordKey = (NaiveDate, String);

#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub country: String,
    pub energy_gwh: FuelValues,
}

impl DailyRecord {
    pub fn new(date: NaiveDate, country: impl Into<String>, energy_gwh: FuelValues) -> Self {
        Self {
            date,
            country: country.into(),
            energy_gwh,
        }
    }

    pub fn key(&self) -> RecordKey {
        (self.date, self.country.clone())
    }

    pub fn fuel_gwh(&self, fuel: Fuel) -> f64 {
        self.energy_gwh.get(fuel)
    }

    /// Always derived from the fuel columns.
    pub fn total_fossil_gwh(&self) -> f64 {
        self.energy_gwh.total()
    }
}

/// The persisted history: unique on (date, country), ordered by that key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricalDataset {
    records: Vec<DailyRecord>,
}

impl HistoricalDataset {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a dataset from rows in arrival order. When two rows share a
    /// key, the later one is kept.
    pub fn from_records(records: impl IntoIterator<Item = DailyRecord>) -> Self {
        let mut by_key: BTreeMap<RecordKey, DailyRecord> = BTreeMap::new();
        for record in records {
            by_key.insert(record.key(), record);
        }
        Self {
            records: by_key.into_values().collect(),
        }
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, date: NaiveDate, country: &str) -> Option<&DailyRecord> {
        self.records
            .binary_search_by(|r| (r.date, r.country.as_str()).cmp(&(date, country)))
            .ok()
            .map(|idx| &self.records[idx])
    }

    /// Most recent date present for each country.
    pub fn latest_dates(&self) -> HashMap<String, NaiveDate> {
        let mut latest: HashMap<String, NaiveDate> = HashMap::new();
        for record in &self.records {
            latest
                .entry(record.country.clone())
                .and_modify(|d| *d = (*d).max(record.date))
                .or_insert(record.date);
        }
        latest
    }

    pub fn countries(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.country.as_str()).collect()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        // Records are sorted by date first
        let first = self.records.first()?;
        let last = self.records.last()?;
        Some((first.date, last.date))
    }

    /// Date-ordered series for one country.
    pub fn series_for(&self, country: &str) -> Vec<DailyRecord> {
        self.records
            .iter()
            .filter(|r| r.country == country)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, d).unwrap()
    }

    #[test]
    fn test_total_is_sum_of_fuels() {
        let record = DailyRecord::new(day(1), "Germany", FuelValues::new(100.0, 50.5, 20.25));
        assert_eq!(record.total_fossil_gwh(), 170.75);
    }

    #[test]
    fn test_from_records_sorts_and_keeps_last_duplicate() {
        let dataset = HistoricalDataset::from_records(vec![
            DailyRecord::new(day(2), "Poland", FuelValues::new(1.0, 0.0, 0.0)),
            DailyRecord::new(day(1), "Poland", FuelValues::new(2.0, 0.0, 0.0)),
            DailyRecord::new(day(1), "Austria", FuelValues::new(3.0, 0.0, 0.0)),
            DailyRecord::new(day(2), "Poland", FuelValues::new(9.0, 0.0, 0.0)),
        ]);

        let keys: Vec<(NaiveDate, &str)> = dataset
            .records()
            .iter()
            .map(|r| (r.date, r.country.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![(day(1), "Austria"), (day(1), "Poland"), (day(2), "Poland")]
        );
        assert_eq!(dataset.get(day(2), "Poland").unwrap().energy_gwh.lignite, 9.0);
    }

    #[test]
    fn test_latest_dates_per_country() {
        let dataset = HistoricalDataset::from_records(vec![
            DailyRecord::new(day(3), "Spain", FuelValues::default()),
            DailyRecord::new(day(5), "Spain", FuelValues::default()),
            DailyRecord::new(day(4), "Italy", FuelValues::default()),
        ]);

        let latest = dataset.latest_dates();
        assert_eq!(latest.get("Spain"), Some(&day(5)));
        assert_eq!(latest.get("Italy"), Some(&day(4)));
        assert_eq!(dataset.date_range(), Some((day(3), day(5))));
    }
}
