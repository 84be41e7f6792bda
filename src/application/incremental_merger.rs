// Incremental merger - Folds freshly aggregated records into the history
use crate::domain::dataset::{DailyRecord, HistoricalDataset, RecordKey};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    /// Nothing new arrived; the existing dataset stands as is.
    UpToDate,
    Merged {
        dataset: HistoricalDataset,
        inserted: usize,
        replaced: usize,
    },
}

/// Merge `incoming` over `existing`, keyed on (date, country). An incoming
/// record replaces an existing one with the same key; among incoming
/// records sharing a key, the last one wins.
pub fn merge(existing: &HistoricalDataset, incoming: Vec<DailyRecord>) -> MergeOutcome {
    if incoming.is_empty() {
        return MergeOutcome::UpToDate;
    }

    let incoming: BTreeMap<RecordKey, DailyRecord> =
        incoming.into_iter().map(|r| (r.key(), r)).collect();

    let replaced = incoming
        .values()
        .filter(|r| existing.get(r.date, &r.country).is_some())
        .count();
    let inserted = incoming.len() - replaced;

    let dataset = HistoricalDataset::from_records(
        existing
            .records()
            .iter()
            .cloned()
            .chain(incoming.into_values()),
    );

    MergeOutcome::Merged {
        dataset,
        inserted,
        replaced,
    }
}
