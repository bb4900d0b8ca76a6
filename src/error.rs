use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReceiptError {
    /// The receipt is malformed or incomplete.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
    /// No receipt exists for the requested identifier.
    #[error("No receipt found for id {0}")]
    NotFound(String),
    /// The atomic write (or a read round-trip) could not complete.
    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),
    #[error("Points computation failed: {0}")]
    ComputationFailed(String),
}

impl ReceiptError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationFailed(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::PersistenceFailed(msg.into())
    }

    /// HTTP status a caller should answer with for this outcome.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ValidationFailed(_) => 400,
            Self::NotFound(_) => 404,
            Self::PersistenceFailed(_) | Self::ComputationFailed(_) => 500,
        }
    }
}

impl From<serde_json::Error> for ReceiptError {
    fn from(err: serde_json::Error) -> Self {
        Self::PersistenceFailed(format!("Serialization error: {}", err))
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for ReceiptError {
    fn from(err: rocksdb::Error) -> Self {
        Self::PersistenceFailed(format!("RocksDB error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, ReceiptError>;
