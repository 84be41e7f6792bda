// Pipeline error types
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("upstream returned status {status} for {url}: {body}")]
    UpstreamStatus {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed generation payload: {0}")]
    MalformedPayload(String),

    #[error("dataset csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid dataset row {line}: {reason}")]
    InvalidRow { line: u64, reason: String },
}

pub type PipelineResult<T> = Result<T, PipelineError>;
