use thiserror::Error;

/// Errors raised while talking to the inference server
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InferenceError {
    #[error("{endpoint} timed out after {secs}s")]
    Timeout { endpoint: String, secs: u64 },

    #[error("{endpoint} could not connect within {secs}s")]
    ConnectTimeout { endpoint: String, secs: u64 },

    #[error("{endpoint} request failed: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("{endpoint} returned an unexpected payload: {reason}")]
    MalformedPayload { endpoint: String, reason: String },

    #[error("Cannot build url for {endpoint}: {reason}")]
    InvalidUrl { endpoint: String, reason: String },
}

impl InferenceError {
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Timeout { endpoint, .. }
            | Self::ConnectTimeout { endpoint, .. }
            | Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::MalformedPayload { endpoint, .. }
            | Self::InvalidUrl { endpoint, .. } => endpoint,
        }
    }
}
