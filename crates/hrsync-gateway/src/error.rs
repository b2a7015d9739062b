use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Connection, timeout, or body read failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response; `detail` is FastAPI's `detail` field when present
    #[error("HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("gateway configuration: {0}")]
    Config(String),

    /// Failure reported by the in-memory backend
    #[error("{0}")]
    Unavailable(String),
}

impl GatewayError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::Status { status: 404, .. })
    }
}
