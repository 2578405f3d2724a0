//! Pixelsmith-State: persistence layer for generation jobs
//!
//! This crate defines the storage seams the generation pipeline runs
//! against, keeping the engine free of any backend choice.
//!
//! ## Key Components
//!
//! - `JobStore` / `CreditLedger` / `ArtifactStore` / `ProgressPublisher`:
//!   async trait contracts
//! - `JobRecord`, `TierConfig`, `CheckpointBlob`, `ArtifactRecord`,
//!   `GenerationSummary`, `ToolLogArchive`: storage-level records
//! - `fakes`: in-memory implementations for tests
//! - `FsArtifactStore`: filesystem image storage
//! - `BroadcastProgressPublisher`: in-process event fan-out

mod broadcast;
mod error;
pub mod fakes;
mod fs;
pub mod storage_traits;

pub use broadcast::BroadcastProgressPublisher;
pub use error::{StorageError, StorageResult};
pub use fs::FsArtifactStore;
pub use storage_traits::{
    ArtifactRecord, ArtifactStore, CheckpointBlob, CreditLedger, GenerationSummary, JobRecord,
    JobStatus, JobStore, ProgressEvent, ProgressPublisher, TierConfig, ToolLogArchive,
};
