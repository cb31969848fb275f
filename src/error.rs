use thiserror::Error;

use crate::api::ApiError;
use crate::poller::PollerError;

#[derive(Debug, Error)]
pub enum AegisError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Poll error: {0}")]
    Poll(#[from] PollerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
