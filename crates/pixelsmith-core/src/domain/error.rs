//! Fatal error taxonomy for generation runs.
//!
//! Everything here aborts a run and triggers the orchestrator's
//! mark-failed + refund + publish sequence. Per-command failures are NOT
//! errors — the harness absorbs them into failed `ToolCallOutcome`s.

use uuid::Uuid;

/// Errors that abort a generation run.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("job not found: {0}")]
    JobNotFound(Uuid),

    #[error("job {job_id} has unexpected status: {status}")]
    UnexpectedStatus { job_id: Uuid, status: String },

    #[error("tier not found: {0}")]
    TierNotFound(String),

    #[error("generator error: {0}")]
    Generator(#[from] crate::generator::GeneratorError),

    #[error("generation timed out after {0}s")]
    Timeout(u64),

    #[error("storage error: {0}")]
    Storage(#[from] pixelsmith_state::StorageError),

    #[error("codec error: {0}")]
    Codec(#[from] crate::canvas::CodecError),

    #[error("seal error: {0}")]
    Seal(#[from] crate::provenance::SealError),

    #[error("watermark error: {0}")]
    Watermark(#[from] crate::provenance::WatermarkError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for orchestration operations.
pub type Result<T> = std::result::Result<T, JobError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_error_display() {
        let id = Uuid::new_v4();
        let err = JobError::JobNotFound(id);
        assert!(err.to_string().contains("job not found"));

        let err = JobError::UnexpectedStatus {
            job_id: id,
            status: "completed".to_string(),
        };
        assert!(err.to_string().contains("unexpected status: completed"));

        let err = JobError::Timeout(300);
        assert!(err.to_string().contains("300s"));
    }
}
