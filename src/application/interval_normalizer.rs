// Interval normalizer - Converts power samples into energy per sample
use crate::domain::generation::{EnergySample, Sample};
use chrono::{DateTime, Utc};

/// Upper bound on the duration attributed to any sample. Gaps longer than
/// this are under-counted rather than extrapolated.
pub const MAX_INTERVAL_HOURS: f64 = 1.0;

/// Interval used when a series holds a single reading.
pub const SINGLE_SAMPLE_INTERVAL_HOURS: f64 = 1.0;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Sort the samples, infer how long each one lasted and turn MW into MWh.
///
/// Samples sharing a timestamp collapse to the last one received so that
/// every inferred interval is strictly positive.
pub fn normalize(mut samples: Vec<Sample>) -> Vec<EnergySample> {
    samples.sort_by_key(|s| s.timestamp);

    let mut unique: Vec<Sample> = Vec::with_capacity(samples.len());
    for sample in samples {
        match unique.last_mut() {
            Some(last) if last.timestamp == sample.timestamp => *last = sample,
            _ => unique.push(sample),
        }
    }

    let timestamps: Vec<DateTime<Utc>> = unique.iter().map(|s| s.timestamp).collect();
    let intervals = infer_intervals(&timestamps);

    unique
        .into_iter()
        .zip(intervals)
        .map(|(sample, interval_hours)| EnergySample {
            timestamp: sample.timestamp,
            interval_hours,
            energy_mwh: sample.power_mw.scale(interval_hours),
        })
        .collect()
}

/// Interval in hours for each timestamp of an ascending series.
///
/// Each interval is the distance to the previous timestamp, capped at
/// [`MAX_INTERVAL_HOURS`]. The first timestamp has nothing to look back at
/// and borrows the second one's interval.
pub fn infer_intervals(timestamps: &[DateTime<Utc>]) -> Vec<f64> {
    match timestamps.len() {
        0 => Vec::new(),
        1 => vec![SINGLE_SAMPLE_INTERVAL_HOURS],
        len => {
            let mut intervals = Vec::with_capacity(len);
            // Placeholder, overwritten below
            intervals.push(0.0);
            for pair in timestamps.windows(2) {
                let hours = (pair[1] - pair[0]).num_milliseconds() as f64 / MILLIS_PER_HOUR;
                intervals.push(hours.min(MAX_INTERVAL_HOURS));
            }
            intervals[0] = intervals[1];
            intervals
        }
    }
}
