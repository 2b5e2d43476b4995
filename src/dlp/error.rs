use thiserror::Error;

/// Failures surfaced by a DLP client. Every variant is fatal to the caller;
/// nothing here is retried.
#[derive(Debug, Error)]
pub enum DlpError {
    #[error("request to DLP service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("DLP service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode DLP response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid DLP endpoint {0}")]
    InvalidEndpoint(String),

    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DlpError>;
