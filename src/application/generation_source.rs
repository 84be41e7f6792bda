// Source trait for hourly generation data
use crate::domain::country::Country;
use crate::domain::generation::Sample;
use crate::domain::window::FetchWindow;
use crate::error::PipelineResult;
use async_trait::async_trait;

#[async_trait]
pub trait GenerationSource: Send + Sync {
    /// Fetch raw power samples for one country over an inclusive date window.
    /// Samples may come back unordered.
    async fn fetch_samples(&self, country: &Country, window: FetchWindow) -> PipelineResult<Vec<Sample>>;
}
