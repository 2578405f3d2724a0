//! Abstract pixel-art command producer (the LLM integration seam).
//!
//! The orchestration core depends only on this narrow capability: given a
//! prompt and the generation constraints, produce an ordered sequence of
//! named tool calls. Transport, prompting, and retry policy all live behind
//! the trait, in the out-of-scope integration layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One tool call produced by the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

/// Constraints handed to the generator for one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub allowed_tools: Vec<String>,
    /// Soft cap on produced tool calls.
    pub max_iterations: u32,
    /// Wall-clock budget the generator should stay within.
    pub time_budget_seconds: u64,
}

/// Errors from the generator backend. All of them are fatal for the run.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("generator timed out: {0}")]
    Timeout(String),

    #[error("malformed generator response: {0}")]
    Malformed(String),
}

/// Backend capable of producing a pixel-art tool-call sequence.
#[async_trait]
pub trait PixelArtGenerator: Send + Sync {
    /// Produce an ordered tool-call sequence for `prompt`.
    async fn generate(
        &self,
        prompt: &str,
        request: &GenerationRequest,
    ) -> Result<Vec<ToolCall>, GeneratorError>;
}
