// Repository trait for the persisted daily dataset
use crate::domain::dataset::HistoricalDataset;
use crate::error::PipelineResult;

pub trait DatasetRepository: Send + Sync {
    /// Load the full history. A dataset that does not exist yet loads as empty.
    fn load(&self) -> PipelineResult<HistoricalDataset>;

    /// Replace the stored history with `dataset`.
    fn save(&self, dataset: &HistoricalDataset) -> PipelineResult<()>;
}
