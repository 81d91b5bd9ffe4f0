use thiserror::Error;

#[derive(Error, Debug)]
pub enum LifecycleError {
    /// A raw partner status that has no entry in the synonym table.
    #[error("unknown status: {0:?}")]
    UnknownStatus(String),
    #[error("reactor '{reactor}' failed: {reason}")]
    Reactor { reactor: String, reason: String },
    /// A single webhook delivery failed (network, timeout or non-2xx).
    #[error("delivery to {url} failed: {reason}")]
    Delivery { url: String, reason: String },
    #[error("notification send failed: {0}")]
    Notification(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    StorageError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

impl LifecycleError {
    /// Wraps this error as the failure of the named reactor.
    pub fn into_reactor_error(self, reactor: &str) -> Self {
        match self {
            err @ LifecycleError::Reactor { .. } => err,
            other => LifecycleError::Reactor {
                reactor: reactor.to_string(),
                reason: other.to_string(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, LifecycleError>;
