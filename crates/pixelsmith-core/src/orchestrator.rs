//! Generation orchestrator — state machine for art generation jobs.
//!
//! State machine: `Pending → ExecutingTools → Rendering → Completed | Failed`
//!
//! One call to [`GenerationOrchestrator::run`] drives exactly one job:
//!
//! 1. Load the job row, assert it is `Pending`, load its tier config
//! 2. Build a [`ToolHarness`] and request a tool-call sequence from the
//!    generator, bounded by the tier's job timeout
//! 3. Execute each call through the harness, logging every attempt and
//!    publishing best-effort progress events
//! 4. Checkpoint the canvas every `CHECKPOINT_INTERVAL` successful calls
//! 5. On seal or budget exhaustion: watermark, export, HMAC-seal, persist
//!    the artifact, summary, and compressed tool log, mark `Completed`
//! 6. On any fatal error: mark `Failed`, refund the tier's credit cost,
//!    publish a failure event — compensation is best-effort and never
//!    re-raises

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use flate2::write::GzEncoder;
use flate2::Compression;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use pixelsmith_state::{
    ArtifactRecord, ArtifactStore, CheckpointBlob, CreditLedger, GenerationSummary, JobStatus,
    JobStore, ProgressEvent, ProgressPublisher, ToolLogArchive,
};

use crate::canvas::{codec, Canvas};
use crate::domain::{JobContext, JobError, Result, ToolCallRecord};
use crate::generator::{GenerationRequest, PixelArtGenerator};
use crate::obs;
use crate::provenance::{watermark, SealKeyring, SealMetadata};
use crate::tools::{HarnessConfig, ToolHarness};

/// Checkpoint the canvas after this many successful tool calls.
pub const CHECKPOINT_INTERVAL: u32 = 50;

/// Longest edge of the generated thumbnail.
const THUMBNAIL_MAX_SIZE: u32 = 64;

/// Main state machine for art generation jobs.
///
/// Coordinates the full generation flow: tool execution, checkpointing,
/// watermarking, HMAC sealing, and record creation. Collaborators are
/// injected as trait objects so the core carries no backend choice.
pub struct GenerationOrchestrator {
    jobs: Arc<dyn JobStore>,
    credits: Arc<dyn CreditLedger>,
    artifacts: Arc<dyn ArtifactStore>,
    publisher: Arc<dyn ProgressPublisher>,
    generator: Arc<dyn PixelArtGenerator>,
    keyring: SealKeyring,
    model_name: String,
}

impl GenerationOrchestrator {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        credits: Arc<dyn CreditLedger>,
        artifacts: Arc<dyn ArtifactStore>,
        publisher: Arc<dyn ProgressPublisher>,
        generator: Arc<dyn PixelArtGenerator>,
        keyring: SealKeyring,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            jobs,
            credits,
            artifacts,
            publisher,
            generator,
            keyring,
            model_name: model_name.into(),
        }
    }

    /// Execute the full generation pipeline for `job_id`.
    ///
    /// Never returns an error: every fatal failure funnels into the
    /// mark-failed + refund + publish compensation path. Designed to be
    /// `tokio::spawn`ed fire-and-forget by the request layer.
    pub async fn run(&self, job_id: Uuid, prompt: &str) {
        let _span = obs::JobSpan::enter(&job_id.to_string());

        let mut ctx_slot: Option<JobContext> = None;
        if let Err(err) = self.run_phases(job_id, prompt, &mut ctx_slot).await {
            tracing::error!(job_id = %job_id, error = %err, "generation failed");
            self.handle_failure(job_id, ctx_slot.as_ref(), &err.to_string())
                .await;
        }
    }

    async fn run_phases(
        &self,
        job_id: Uuid,
        prompt: &str,
        ctx_slot: &mut Option<JobContext>,
    ) -> Result<()> {
        let ctx = ctx_slot.insert(self.initialise(job_id).await?);
        ctx.prompt = prompt.to_string();

        let canvas = self.execute_tools(ctx).await?;
        self.seal_and_persist(ctx, canvas).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Phase 1 — initialise
    // ------------------------------------------------------------------

    /// Load job and tier, validate `Pending` status, transition to
    /// `ExecutingTools`.
    async fn initialise(&self, job_id: Uuid) -> Result<JobContext> {
        let job = self
            .jobs
            .load_job(job_id)
            .await?
            .ok_or(JobError::JobNotFound(job_id))?;

        if job.status != JobStatus::Pending {
            return Err(JobError::UnexpectedStatus {
                job_id,
                status: job.status.to_string(),
            });
        }

        let tier = self
            .jobs
            .load_tier(&job.tier_name)
            .await?
            .ok_or_else(|| JobError::TierNotFound(job.tier_name.clone()))?;

        self.jobs
            .set_status(job_id, JobStatus::ExecutingTools)
            .await?;
        obs::emit_job_started(&job_id.to_string(), &job.tier_name);

        Ok(JobContext::new(job_id, job.user_id, job.tier_name, tier))
    }

    // ------------------------------------------------------------------
    // Phase 2 — execute tool calls
    // ------------------------------------------------------------------

    /// Run the generator and execute its tool calls through the harness.
    ///
    /// Returns the finished canvas (sealed, or with the sequence/budget
    /// exhausted).
    async fn execute_tools(&self, ctx: &mut JobContext) -> Result<Canvas> {
        let tier = ctx.tier.clone();
        let mut harness = ToolHarness::new(HarnessConfig::from_tier(&tier));

        let request = GenerationRequest {
            canvas_width: tier.canvas_width,
            canvas_height: tier.canvas_height,
            allowed_tools: tier.allowed_tools.clone(),
            max_iterations: tier.tool_budget_soft,
            time_budget_seconds: tier.job_timeout_seconds,
        };

        let tool_calls = tokio::time::timeout(
            Duration::from_secs(tier.job_timeout_seconds),
            self.generator.generate(&ctx.prompt, &request),
        )
        .await
        .map_err(|_| JobError::Timeout(tier.job_timeout_seconds))??;

        let mut last_checkpointed = 0u32;
        for call in tool_calls {
            let outcome = harness.execute(&call.name, &call.arguments);
            let executed = harness.tool_calls_executed();
            obs::emit_tool_executed(
                &ctx.job_id.to_string(),
                &call.name,
                outcome.success,
                executed,
            );

            ctx.tool_call_log.push(ToolCallRecord {
                tool_name: call.name,
                arguments: call.arguments,
                success: outcome.success,
                message: outcome.message,
            });

            self.publish_best_effort(
                ctx.job_id,
                ProgressEvent::Progress {
                    commands_executed: executed,
                    command_budget: tier.tool_budget_hard,
                    status: JobStatus::ExecutingTools,
                },
            )
            .await;

            // Checkpoint once per interval of *successful* calls; the
            // counter only moves on success, so the pair is consistent.
            if executed > 0 && executed % CHECKPOINT_INTERVAL == 0 && executed != last_checkpointed
            {
                let canvas_gz = codec::checkpoint(harness.canvas())?;
                self.jobs
                    .save_checkpoint(
                        ctx.job_id,
                        CheckpointBlob {
                            canvas_gz,
                            tool_index: executed,
                            saved_at: Utc::now(),
                        },
                    )
                    .await?;
                obs::emit_checkpoint_saved(&ctx.job_id.to_string(), executed);
                last_checkpointed = executed;
            }

            if harness.is_sealed() {
                break;
            }
        }

        Ok(harness.into_canvas())
    }

    // ------------------------------------------------------------------
    // Phase 3 — seal, watermark, persist
    // ------------------------------------------------------------------

    /// Apply the watermark, create the HMAC seal, write files and rows.
    async fn seal_and_persist(&self, ctx: &JobContext, mut canvas: Canvas) -> Result<()> {
        self.jobs
            .set_status(ctx.job_id, JobStatus::Rendering)
            .await?;

        watermark::encode(&mut canvas, ctx.artifact_id, ctx.user_id)?;

        let image_bytes = codec::export_png(&canvas)?;
        let thumbnail_bytes = codec::thumbnail(&canvas, THUMBNAIL_MAX_SIZE)?;

        let metadata = SealMetadata {
            artifact_id: ctx.artifact_id.to_string(),
            creator_id: ctx.user_id.to_string(),
            model_name: self.model_name.clone(),
            key_version: self.keyring.active_version(),
        };
        let seal = self.keyring.create_seal(&image_bytes, &metadata)?;

        let image_path = self
            .artifacts
            .write_image(&format!("{}.png", ctx.artifact_id), &image_bytes)
            .await?;
        let thumbnail_path = self
            .artifacts
            .write_image(&format!("{}_thumb.png", ctx.artifact_id), &thumbnail_bytes)
            .await?;

        let now = Utc::now();
        self.jobs
            .save_artifact(ArtifactRecord {
                artifact_id: ctx.artifact_id,
                creator_id: ctx.user_id,
                owner_id: ctx.user_id,
                tier_name: ctx.tier_name.clone(),
                canvas_width: ctx.tier.canvas_width,
                canvas_height: ctx.tier.canvas_height,
                model_name: self.model_name.clone(),
                image_path,
                thumbnail_path,
                content_hash: seal.content_hash,
                seal_signature: seal.signature,
                seal_key_version: metadata.key_version,
                // Free-tier art stays non-tradeable.
                tradeable: ctx.tier_name != "free",
                created_at: now,
            })
            .await?;

        let mut breakdown: BTreeMap<String, u64> = BTreeMap::new();
        for record in &ctx.tool_call_log {
            *breakdown.entry(record.tool_name.clone()).or_insert(0) += 1;
        }
        let duration_ms = (now - ctx.started_at).num_milliseconds().max(0) as u64;
        self.jobs
            .save_summary(GenerationSummary {
                job_id: ctx.job_id,
                artifact_id: ctx.artifact_id,
                total_tool_calls: ctx.tool_call_log.len() as u64,
                tool_call_breakdown: breakdown,
                started_at: ctx.started_at,
                finished_at: now,
                duration_ms,
            })
            .await?;

        let raw_log = serde_json::to_vec(&ctx.tool_call_log)?;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&raw_log)?;
        let log_gz = encoder.finish()?;
        self.jobs
            .save_archive(ToolLogArchive {
                job_id: ctx.job_id,
                log_gz,
                sequence_hash: hex::encode(Sha256::digest(&raw_log)),
                created_at: now,
            })
            .await?;

        self.jobs.complete_job(ctx.job_id, ctx.artifact_id).await?;

        self.publish_best_effort(
            ctx.job_id,
            ProgressEvent::Complete {
                artifact_id: ctx.artifact_id,
            },
        )
        .await;
        obs::emit_job_finished(
            &ctx.job_id.to_string(),
            duration_ms,
            ctx.tool_call_log.len() as u64,
            true,
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Failure handling
    // ------------------------------------------------------------------

    /// Mark the job `Failed` and issue the compensating refund.
    ///
    /// Each step is best-effort: a failure in one is logged and does not
    /// stop the others, and nothing here re-raises.
    async fn handle_failure(&self, job_id: Uuid, ctx: Option<&JobContext>, error: &str) {
        if let Err(err) = self.jobs.set_failed(job_id, error).await {
            tracing::error!(job_id = %job_id, error = %err, "failed to mark job failed");
        }

        // A refund needs the tier's cost; without a context the job never
        // left Pending and nothing was reserved against it.
        if let Some(ctx) = ctx {
            match self
                .credits
                .refund(ctx.user_id, ctx.tier.credit_cost, ctx.job_id)
                .await
            {
                Ok(_) => obs::emit_refund_issued(
                    &job_id.to_string(),
                    &ctx.user_id.to_string(),
                    ctx.tier.credit_cost,
                ),
                Err(err) => {
                    tracing::error!(job_id = %job_id, error = %err, "refund failed");
                }
            }
        }

        self.publish_best_effort(
            job_id,
            ProgressEvent::Failed {
                error: error.to_string(),
            },
        )
        .await;
    }

    /// Publish an event, logging and swallowing any delivery failure.
    async fn publish_best_effort(&self, job_id: Uuid, event: ProgressEvent) {
        if let Err(err) = self.publisher.publish(job_id, event).await {
            tracing::warn!(job_id = %job_id, error = %err, "progress publish failed");
        }
    }
}
