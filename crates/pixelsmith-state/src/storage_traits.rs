//! Storage trait definitions for Pixelsmith
//!
//! These traits define the persistence seams the generation orchestrator
//! runs against:
//! - `JobStore`: generation job rows, tier lookups, checkpoints, artifacts
//! - `CreditLedger`: atomic credit debits and refunds
//! - `ArtifactStore`: rendered image bytes keyed by artifact id
//! - `ProgressPublisher`: best-effort per-job progress events
//!
//! All traits are async and backend-agnostic. In-memory fakes are provided
//! for testing via the `fakes` module.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StorageResult;

// ---------------------------------------------------------------------------
// Job records
// ---------------------------------------------------------------------------

/// Lifecycle status of a generation job.
///
/// Transitions: Pending → ExecutingTools → Rendering → Completed | Failed.
/// Failed can be entered from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    ExecutingTools,
    Rendering,
    Completed,
    Failed,
}

impl JobStatus {
    /// Lowercase wire form, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::ExecutingTools => "executing_tools",
            JobStatus::Rendering => "rendering",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved generation tier configuration.
///
/// Immutable for the lifetime of a job: canvas geometry, credit pricing,
/// command budgets, timeout, and the tool allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub credit_cost: i64,
    pub tool_budget_soft: u32,
    pub tool_budget_hard: u32,
    pub job_timeout_seconds: u64,
    pub allowed_tools: Vec<String>,
}

/// Durable canvas snapshot taken at fixed command-count intervals.
///
/// One recoverable snapshot per job; each save overwrites the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointBlob {
    /// Gzip-compressed PNG canvas bytes.
    pub canvas_gz: Vec<u8>,
    /// Number of tool calls executed when the snapshot was taken.
    pub tool_index: u32,
    /// When the snapshot was taken.
    pub saved_at: DateTime<Utc>,
}

/// A generation job row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub tier_name: String,
    pub status: JobStatus,
    pub error_message: Option<String>,
    pub artifact_id: Option<Uuid>,
    pub checkpoint: Option<CheckpointBlob>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobRecord {
    /// Create a fresh pending job.
    pub fn new(job_id: Uuid, user_id: Uuid, tier_name: impl Into<String>) -> Self {
        Self {
            job_id,
            user_id,
            tier_name: tier_name.into(),
            status: JobStatus::Pending,
            error_message: None,
            artifact_id: None,
            checkpoint: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Artifact records
// ---------------------------------------------------------------------------

/// Metadata row for a finished artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub artifact_id: Uuid,
    pub creator_id: Uuid,
    pub owner_id: Uuid,
    pub tier_name: String,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub model_name: String,
    pub image_path: String,
    pub thumbnail_path: String,
    /// SHA-256 of the delivered image bytes, hex encoded.
    pub content_hash: String,
    /// HMAC seal over content hash + identity metadata, hex encoded.
    pub seal_signature: String,
    pub seal_key_version: u32,
    /// Free-tier artifacts are not tradeable.
    pub tradeable: bool,
    pub created_at: DateTime<Utc>,
}

/// Aggregated outcome of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub job_id: Uuid,
    pub artifact_id: Uuid,
    pub total_tool_calls: u64,
    /// Per-tool-name call counts, including failed attempts.
    pub tool_call_breakdown: BTreeMap<String, u64>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
}

/// Compressed archive of the full ordered tool-call log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolLogArchive {
    pub job_id: Uuid,
    /// Gzip-compressed JSON array of tool-call records.
    pub log_gz: Vec<u8>,
    /// SHA-256 of the uncompressed JSON, hex encoded.
    pub sequence_hash: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Progress events
// ---------------------------------------------------------------------------

/// Event published to a job's progress channel.
///
/// The serde representation is the wire format consumed by server-push
/// streams: `{"event":"progress",...}`, `{"event":"complete",...}`,
/// `{"event":"failed",...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    Progress {
        commands_executed: u32,
        command_budget: u32,
        status: JobStatus,
    },
    Complete {
        artifact_id: Uuid,
    },
    Failed {
        error: String,
    },
}

// ---------------------------------------------------------------------------
// JobStore — generation job persistence
// ---------------------------------------------------------------------------

/// Generation job store.
///
/// Guarantees:
/// - `save_checkpoint` overwrites the job's single checkpoint slot; the
///   blob is written atomically with its tool index.
/// - `complete_job` and `set_failed` are terminal; both stamp
///   `completed_at`.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Load a job row by id, `None` if absent.
    async fn load_job(&self, job_id: Uuid) -> StorageResult<Option<JobRecord>>;

    /// Load a tier definition by name, `None` if absent.
    async fn load_tier(&self, tier_name: &str) -> StorageResult<Option<TierConfig>>;

    /// Update the job status.
    async fn set_status(&self, job_id: Uuid, status: JobStatus) -> StorageResult<()>;

    /// Mark the job failed with an error message.
    async fn set_failed(&self, job_id: Uuid, error_message: &str) -> StorageResult<()>;

    /// Persist the job's checkpoint slot.
    async fn save_checkpoint(&self, job_id: Uuid, checkpoint: CheckpointBlob)
        -> StorageResult<()>;

    /// Insert the artifact metadata row.
    async fn save_artifact(&self, artifact: ArtifactRecord) -> StorageResult<()>;

    /// Insert the generation summary row.
    async fn save_summary(&self, summary: GenerationSummary) -> StorageResult<()>;

    /// Insert the compressed tool-call archive.
    async fn save_archive(&self, archive: ToolLogArchive) -> StorageResult<()>;

    /// Mark the job completed, linking the produced artifact.
    async fn complete_job(&self, job_id: Uuid, artifact_id: Uuid) -> StorageResult<()>;
}

// ---------------------------------------------------------------------------
// CreditLedger — user balance operations
// ---------------------------------------------------------------------------

/// User credit ledger.
///
/// Guarantees:
/// - `debit_if_sufficient` is an atomic decrement-if-sufficient; it never
///   lets a balance go negative, even under concurrent callers.
/// - `refund` is an unconditional increment.
/// - Both return the new balance and record a transaction against
///   `reference_id`.
#[async_trait]
pub trait CreditLedger: Send + Sync {
    /// Atomically deduct `amount` if the balance covers it.
    ///
    /// Returns `StorageError::InsufficientCredits` otherwise.
    async fn debit_if_sufficient(
        &self,
        user_id: Uuid,
        amount: i64,
        reference_id: Uuid,
    ) -> StorageResult<i64>;

    /// Credit `amount` back to the user.
    async fn refund(&self, user_id: Uuid, amount: i64, reference_id: Uuid) -> StorageResult<i64>;
}

// ---------------------------------------------------------------------------
// ArtifactStore — rendered image bytes
// ---------------------------------------------------------------------------

/// Blob store for rendered images.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Write image bytes under `file_name` and return the stored path.
    async fn write_image(&self, file_name: &str, bytes: &[u8]) -> StorageResult<String>;
}

// ---------------------------------------------------------------------------
// ProgressPublisher — per-job event channel
// ---------------------------------------------------------------------------

/// Best-effort per-job progress channel.
///
/// Delivery is at-most-once; consumers must tolerate missed events and
/// rely on polling or keepalive for completeness.
#[async_trait]
pub trait ProgressPublisher: Send + Sync {
    /// Publish an event to the job's channel.
    async fn publish(&self, job_id: Uuid, event: ProgressEvent) -> StorageResult<()>;
}
