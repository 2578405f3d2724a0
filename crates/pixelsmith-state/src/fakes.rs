//! In-memory fakes for storage traits (testing only)
//!
//! Provides `MemoryJobStore`, `MemoryCreditLedger`, `MemoryArtifactStore`,
//! and `MemoryProgressPublisher` that satisfy the trait contracts without
//! any external dependencies.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};
use crate::storage_traits::*;

// ---------------------------------------------------------------------------
// MemoryJobStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct JobStoreState {
    jobs: HashMap<Uuid, JobRecord>,
    tiers: HashMap<String, TierConfig>,
    artifacts: Vec<ArtifactRecord>,
    summaries: Vec<GenerationSummary>,
    archives: Vec<ToolLogArchive>,
    /// Tool indices at which checkpoints were saved, in order.
    checkpoint_history: Vec<u32>,
}

/// In-memory job store. Seed with `insert_job` / `insert_tier`.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    state: Mutex<JobStoreState>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a job row.
    pub fn insert_job(&self, record: JobRecord) {
        let mut state = self.state.lock().unwrap();
        state.jobs.insert(record.job_id, record);
    }

    /// Seed a tier definition.
    pub fn insert_tier(&self, tier_name: impl Into<String>, tier: TierConfig) {
        let mut state = self.state.lock().unwrap();
        state.tiers.insert(tier_name.into(), tier);
    }

    /// Snapshot of a job row.
    pub fn job(&self, job_id: Uuid) -> Option<JobRecord> {
        self.state.lock().unwrap().jobs.get(&job_id).cloned()
    }

    /// All artifact rows inserted so far.
    pub fn artifacts(&self) -> Vec<ArtifactRecord> {
        self.state.lock().unwrap().artifacts.clone()
    }

    /// All summary rows inserted so far.
    pub fn summaries(&self) -> Vec<GenerationSummary> {
        self.state.lock().unwrap().summaries.clone()
    }

    /// All archive rows inserted so far.
    pub fn archives(&self) -> Vec<ToolLogArchive> {
        self.state.lock().unwrap().archives.clone()
    }

    /// Tool indices at which checkpoints were saved, in order.
    pub fn checkpoint_history(&self) -> Vec<u32> {
        self.state.lock().unwrap().checkpoint_history.clone()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn load_job(&self, job_id: Uuid) -> StorageResult<Option<JobRecord>> {
        Ok(self.state.lock().unwrap().jobs.get(&job_id).cloned())
    }

    async fn load_tier(&self, tier_name: &str) -> StorageResult<Option<TierConfig>> {
        Ok(self.state.lock().unwrap().tiers.get(tier_name).cloned())
    }

    async fn set_status(&self, job_id: Uuid, status: JobStatus) -> StorageResult<()> {
        let mut state = self.state.lock().unwrap();
        let job = state
            .jobs
            .get_mut(&job_id)
            .ok_or(StorageError::JobNotFound { job_id })?;
        job.status = status;
        Ok(())
    }

    async fn set_failed(&self, job_id: Uuid, error_message: &str) -> StorageResult<()> {
        let mut state = self.state.lock().unwrap();
        let job = state
            .jobs
            .get_mut(&job_id)
            .ok_or(StorageError::JobNotFound { job_id })?;
        job.status = JobStatus::Failed;
        job.error_message = Some(error_message.to_string());
        job.completed_at = Some(Utc::now());
        Ok(())
    }

    async fn save_checkpoint(
        &self,
        job_id: Uuid,
        checkpoint: CheckpointBlob,
    ) -> StorageResult<()> {
        let mut state = self.state.lock().unwrap();
        let job = state
            .jobs
            .get_mut(&job_id)
            .ok_or(StorageError::JobNotFound { job_id })?;
        job.checkpoint = Some(checkpoint.clone());
        state.checkpoint_history.push(checkpoint.tool_index);
        Ok(())
    }

    async fn save_artifact(&self, artifact: ArtifactRecord) -> StorageResult<()> {
        self.state.lock().unwrap().artifacts.push(artifact);
        Ok(())
    }

    async fn save_summary(&self, summary: GenerationSummary) -> StorageResult<()> {
        self.state.lock().unwrap().summaries.push(summary);
        Ok(())
    }

    async fn save_archive(&self, archive: ToolLogArchive) -> StorageResult<()> {
        self.state.lock().unwrap().archives.push(archive);
        Ok(())
    }

    async fn complete_job(&self, job_id: Uuid, artifact_id: Uuid) -> StorageResult<()> {
        let mut state = self.state.lock().unwrap();
        let job = state
            .jobs
            .get_mut(&job_id)
            .ok_or(StorageError::JobNotFound { job_id })?;
        job.status = JobStatus::Completed;
        job.artifact_id = Some(artifact_id);
        job.completed_at = Some(Utc::now());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryCreditLedger
// ---------------------------------------------------------------------------

/// One ledger entry: (user, signed amount, reference).
pub type CreditTransaction = (Uuid, i64, Uuid);

/// In-memory credit ledger with atomic conditional debits.
#[derive(Debug, Default)]
pub struct MemoryCreditLedger {
    balances: Mutex<HashMap<Uuid, i64>>,
    transactions: Mutex<Vec<CreditTransaction>>,
}

impl MemoryCreditLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user balance.
    pub fn with_balance(self, user_id: Uuid, balance: i64) -> Self {
        self.balances.lock().unwrap().insert(user_id, balance);
        self
    }

    pub fn balance(&self, user_id: Uuid) -> Option<i64> {
        self.balances.lock().unwrap().get(&user_id).copied()
    }

    /// All recorded transactions (debits negative, refunds positive).
    pub fn transactions(&self) -> Vec<CreditTransaction> {
        self.transactions.lock().unwrap().clone()
    }

    /// Refund transactions only.
    pub fn refunds(&self) -> Vec<CreditTransaction> {
        self.transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, amount, _)| *amount > 0)
            .copied()
            .collect()
    }
}

#[async_trait]
impl CreditLedger for MemoryCreditLedger {
    async fn debit_if_sufficient(
        &self,
        user_id: Uuid,
        amount: i64,
        reference_id: Uuid,
    ) -> StorageResult<i64> {
        let mut balances = self.balances.lock().unwrap();
        let balance = balances
            .get_mut(&user_id)
            .ok_or(StorageError::UserNotFound { user_id })?;
        if *balance < amount {
            return Err(StorageError::InsufficientCredits {
                user_id,
                requested: amount,
                available: *balance,
            });
        }
        *balance -= amount;
        let new_balance = *balance;
        drop(balances);

        self.transactions
            .lock()
            .unwrap()
            .push((user_id, -amount, reference_id));
        Ok(new_balance)
    }

    async fn refund(&self, user_id: Uuid, amount: i64, reference_id: Uuid) -> StorageResult<i64> {
        let mut balances = self.balances.lock().unwrap();
        let balance = balances.entry(user_id).or_insert(0);
        *balance += amount;
        let new_balance = *balance;
        drop(balances);

        self.transactions
            .lock()
            .unwrap()
            .push((user_id, amount, reference_id));
        Ok(new_balance)
    }
}

// ---------------------------------------------------------------------------
// MemoryArtifactStore
// ---------------------------------------------------------------------------

/// In-memory artifact blob store backed by a `HashMap<name, bytes>`.
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self, file_name: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(file_name).cloned()
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn write_image(&self, file_name: &str, bytes: &[u8]) -> StorageResult<String> {
        self.files
            .lock()
            .unwrap()
            .insert(file_name.to_string(), bytes.to_vec());
        Ok(format!("mem://{file_name}"))
    }
}

// ---------------------------------------------------------------------------
// MemoryProgressPublisher
// ---------------------------------------------------------------------------

/// Progress publisher that records every event for inspection.
#[derive(Debug, Default)]
pub struct MemoryProgressPublisher {
    events: Mutex<Vec<(Uuid, ProgressEvent)>>,
}

impl MemoryProgressPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// All published events, in order.
    pub fn events(&self) -> Vec<(Uuid, ProgressEvent)> {
        self.events.lock().unwrap().clone()
    }

    /// Events for one job, in order.
    pub fn events_for(&self, job_id: Uuid) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == job_id)
            .map(|(_, event)| event.clone())
            .collect()
    }
}

#[async_trait]
impl ProgressPublisher for MemoryProgressPublisher {
    async fn publish(&self, job_id: Uuid, event: ProgressEvent) -> StorageResult<()> {
        self.events.lock().unwrap().push((job_id, event));
        Ok(())
    }
}
