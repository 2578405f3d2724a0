//! Pixelsmith Core Library
//!
//! The pixel-art generation pipeline: a sandboxed interpreter that executes
//! LLM-issued drawing commands against a bounded canvas, plus the job state
//! machine that drives a generation from creation to a sealed, watermarked
//! artifact (or a compensated failure).

pub mod canvas;
pub mod domain;
pub mod generator;
pub mod obs;
pub mod orchestrator;
pub mod provenance;
pub mod telemetry;
pub mod tools;

pub use canvas::{Canvas, CodecError};
pub use domain::{JobContext, JobError, Result, ToolCallRecord};
pub use generator::{GenerationRequest, GeneratorError, PixelArtGenerator, ToolCall};
pub use orchestrator::{GenerationOrchestrator, CHECKPOINT_INTERVAL};
pub use provenance::{Seal, SealError, SealKeyring, SealMetadata, WatermarkError};
pub use tools::{HarnessConfig, HarnessState, ToolCallOutcome, ToolHarness, ToolName};

pub use pixelsmith_state::{
    ArtifactRecord, ArtifactStore, CheckpointBlob, CreditLedger, GenerationSummary, JobRecord,
    JobStatus, JobStore, ProgressEvent, ProgressPublisher, TierConfig, ToolLogArchive,
};

pub use telemetry::init_tracing;

/// Pixelsmith version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
