use tasklist_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Rejected locally; no request was sent.
    #[error("{0}")]
    Validation(String),
    #[error("task {0} is not in the list")]
    UnknownTask(u64),
    /// Transport failure or a non-OK response.
    #[error("request failed: {0}")]
    Request(String),
    #[error("local store: {0}")]
    Local(#[from] AppError),
}

impl ClientError {
    pub fn validation<M: Into<String>>(message: M) -> Self {
        Self::Validation(message.into())
    }

    pub fn request<M: Into<String>>(message: M) -> Self {
        Self::Request(message.into())
    }
}
