use jumplink_core::{CoreError, StorageError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors returned by the link store.
///
/// `InvalidFormat`, `InvalidUrl` and `Conflict` describe a bad request and
/// can be fixed by the caller. `Storage` means the backing file or database
/// failed; the store's visible state is unchanged and nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("invalid short code: {0}")]
    InvalidFormat(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("short code already exists: {0}")]
    Conflict(String),
    #[error("storage error: {0}")]
    Storage(StorageError),
}

impl StoreError {
    /// Whether the failure was caused by the request rather than the backend.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, StoreError::Storage(_))
    }
}

impl From<CoreError> for StoreError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidShortCode(message) => Self::InvalidFormat(message),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Conflict(code) => Self::Conflict(code),
            other => Self::Storage(other),
        }
    }
}
