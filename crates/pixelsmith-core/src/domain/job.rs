//! Per-run job state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pixelsmith_state::TierConfig;

/// One attempted tool call, as recorded in the job log.
///
/// Immutable once created; the log is append-only for the job's lifetime
/// and is archived verbatim when the job completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub tool_name: String,
    pub arguments: serde_json::Value,
    pub success: bool,
    pub message: String,
}

/// Mutable state for a single generation run.
///
/// Owned by the orchestrator for exactly one run; single writer, never
/// shared across runs.
#[derive(Debug, Clone)]
pub struct JobContext {
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub tier_name: String,
    pub tier: TierConfig,
    pub prompt: String,
    pub artifact_id: Uuid,
    pub tool_call_log: Vec<ToolCallRecord>,
    pub started_at: DateTime<Utc>,
}

impl JobContext {
    pub fn new(job_id: Uuid, user_id: Uuid, tier_name: impl Into<String>, tier: TierConfig) -> Self {
        Self {
            job_id,
            user_id,
            tier_name: tier_name.into(),
            tier,
            prompt: String::new(),
            artifact_id: Uuid::new_v4(),
            tool_call_log: Vec::new(),
            started_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier() -> TierConfig {
        TierConfig {
            canvas_width: 16,
            canvas_height: 16,
            credit_cost: 1,
            tool_budget_soft: 4,
            tool_budget_hard: 5,
            job_timeout_seconds: 60,
            allowed_tools: vec!["set_pixel".to_string()],
        }
    }

    #[test]
    fn test_new_context_defaults() {
        let ctx = JobContext::new(Uuid::new_v4(), Uuid::new_v4(), "free", tier());
        assert!(ctx.tool_call_log.is_empty());
        assert!(ctx.prompt.is_empty());
        assert_ne!(ctx.artifact_id, Uuid::nil());
    }

    #[test]
    fn test_tool_call_record_serde_roundtrip() {
        let record = ToolCallRecord {
            tool_name: "set_pixel".to_string(),
            arguments: serde_json::json!({"x": 0, "y": 0, "r": 255, "g": 0, "b": 0}),
            success: true,
            message: "Pixel set at (0, 0) to (255, 0, 0)".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: ToolCallRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
