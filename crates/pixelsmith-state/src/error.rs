//! Error types for pixelsmith-state

use thiserror::Error;

/// Errors that can occur in the state persistence layer
#[derive(Error, Debug)]
pub enum StorageError {
    /// Job row missing
    #[error("job not found: {job_id}")]
    JobNotFound { job_id: uuid::Uuid },

    /// Tier definition missing
    #[error("tier not found: {tier_name}")]
    TierNotFound { tier_name: String },

    /// Job is in the wrong state for the requested transition
    #[error("job {job_id} has status {status}, expected {expected}")]
    InvalidJobState {
        job_id: uuid::Uuid,
        status: String,
        expected: String,
    },

    /// User row missing from the credit ledger
    #[error("user not found: {user_id}")]
    UserNotFound { user_id: uuid::Uuid },

    /// Conditional debit refused
    #[error("insufficient credits for user {user_id}: requested {requested}, available {available}")]
    InsufficientCredits {
        user_id: uuid::Uuid,
        requested: i64,
        available: i64,
    },

    /// Progress channel delivery failed
    #[error("progress publish failed: {0}")]
    Publish(String),

    /// Serialization error
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;
