//! Structured observability hooks for generation job lifecycle events.
//!
//! This module provides:
//! - Job-scoped tracing spans via the `JobSpan` RAII guard
//! - Emission functions for key lifecycle events: start, tool execution,
//!   checkpoint, finish, refund
//!
//! Events are emitted at `info!` level and filtered via `RUST_LOG`.

use tracing::info;

/// RAII guard that enters a job-scoped tracing span for the duration of a
/// generation run.
pub struct JobSpan {
    _span: tracing::span::EnteredSpan,
}

impl JobSpan {
    /// Create and enter a span tagged with the job id.
    pub fn enter(job_id: &str) -> Self {
        let span = tracing::info_span!("pixelsmith.job", job_id = %job_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: job run started on a tier.
pub fn emit_job_started(job_id: &str, tier_name: &str) {
    info!(event = "job.started", job_id = %job_id, tier = %tier_name);
}

/// Emit event: one tool call went through the harness.
pub fn emit_tool_executed(job_id: &str, tool_name: &str, success: bool, executed: u32) {
    info!(
        event = "job.tool_executed",
        job_id = %job_id,
        tool = %tool_name,
        success = success,
        executed = executed,
    );
}

/// Emit event: canvas checkpoint persisted.
pub fn emit_checkpoint_saved(job_id: &str, tool_index: u32) {
    info!(event = "job.checkpoint_saved", job_id = %job_id, tool_index = tool_index);
}

/// Emit event: job run finished.
pub fn emit_job_finished(job_id: &str, duration_ms: u64, total_tool_calls: u64, success: bool) {
    info!(
        event = "job.finished",
        job_id = %job_id,
        duration_ms = duration_ms,
        total_tool_calls = total_tool_calls,
        success = success,
    );
}

/// Emit event: compensating refund issued for a failed run.
pub fn emit_refund_issued(job_id: &str, user_id: &str, amount: i64) {
    info!(
        event = "job.refund_issued",
        job_id = %job_id,
        user_id = %user_id,
        amount = amount,
    );
}
