//! Tool harness — validates and executes drawing tool calls on a canvas.
//!
//! The harness enforces a strict validation chain before any drawing
//! function runs:
//!
//! 1. **Tool name** — must be a registered [`ToolName`].
//! 2. **Sealed** — no calls are accepted once the canvas has been sealed.
//! 3. **Tier access** — the tool must appear in the tier's allow-list.
//! 4. **Budget** — `tool_calls_executed` must be below `tool_budget_hard`.
//! 5. **Args** — strict schema validation (unknown fields rejected).
//! 6. **Bounds** — all x/y coordinates must fall inside the canvas.
//! 7. **Execute** — exhaustive static dispatch only; no dynamic lookup of
//!    any kind stands between LLM-controlled input and code.
//!
//! Every failure mode is returned as a failed [`ToolCallOutcome`], so
//! callers never need error handling around `execute`.

use serde::{Deserialize, Serialize};

use pixelsmith_state::TierConfig;

use crate::canvas::Canvas;

use super::executors;
use super::registry::{Axis, ToolInvocation, ToolName};

/// Configuration passed to the harness at creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub allowed_tools: Vec<String>,
    pub tool_budget_hard: u32,
}

impl HarnessConfig {
    /// Derive the harness configuration from a tier definition.
    pub fn from_tier(tier: &TierConfig) -> Self {
        Self {
            canvas_width: tier.canvas_width,
            canvas_height: tier.canvas_height,
            allowed_tools: tier.allowed_tools.clone(),
            tool_budget_hard: tier.tool_budget_hard,
        }
    }
}

/// Outcome of a single tool-call attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallOutcome {
    pub tool_name: String,
    pub success: bool,
    pub message: String,
}

/// Seal state of the harness. `Sealed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    Open,
    Sealed,
}

/// Validates and executes tool calls against an exclusively owned canvas.
#[derive(Debug)]
pub struct ToolHarness {
    config: HarnessConfig,
    canvas: Canvas,
    tool_calls_executed: u32,
    state: HarnessState,
}

impl ToolHarness {
    pub fn new(config: HarnessConfig) -> Self {
        let canvas = Canvas::new(config.canvas_width, config.canvas_height);
        Self {
            config,
            canvas,
            tool_calls_executed: 0,
            state: HarnessState::Open,
        }
    }

    /// Validate and execute a single tool call.
    ///
    /// Returns a [`ToolCallOutcome`] regardless of success or failure.
    pub fn execute(&mut self, tool_name: &str, raw_args: &serde_json::Value) -> ToolCallOutcome {
        match self.try_execute(tool_name, raw_args) {
            Ok(message) => ToolCallOutcome {
                tool_name: tool_name.to_string(),
                success: true,
                message,
            },
            Err(message) => ToolCallOutcome {
                tool_name: tool_name.to_string(),
                success: false,
                message,
            },
        }
    }

    /// Number of successfully executed tool calls. Never exceeds the hard
    /// budget.
    pub fn tool_calls_executed(&self) -> u32 {
        self.tool_calls_executed
    }

    pub fn is_sealed(&self) -> bool {
        self.state == HarnessState::Sealed
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Give up the canvas at the end of a run.
    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }

    /// Replace the canvas, e.g. when resuming from a checkpoint. The
    /// replacement must match the configured dimensions.
    pub fn restore_canvas(&mut self, canvas: Canvas, tool_index: u32) {
        debug_assert_eq!(
            (canvas.width(), canvas.height()),
            (self.config.canvas_width, self.config.canvas_height),
        );
        self.canvas = canvas;
        self.tool_calls_executed = tool_index;
    }

    fn try_execute(
        &mut self,
        tool_name: &str,
        raw_args: &serde_json::Value,
    ) -> Result<String, String> {
        // Phase 1 — pre-flight gates.
        let tool = self.check_preconditions(tool_name)?;

        // Phase 2 — parse and bounds-check arguments. Generators commonly
        // omit the arguments object for no-arg tools.
        let empty = serde_json::Value::Object(serde_json::Map::new());
        let raw_args = if raw_args.is_null() { &empty } else { raw_args };
        let invocation = ToolInvocation::parse(tool, raw_args)?;
        self.check_bounds(&invocation)?;

        // Phase 3 — static dispatch and bookkeeping.
        let message = self.dispatch(&invocation);
        self.tool_calls_executed += 1;
        if tool == ToolName::SealCanvas {
            self.state = HarnessState::Sealed;
        }
        Ok(message)
    }

    /// Gate checks: valid name, seal state, tier access, budget.
    fn check_preconditions(&self, tool_name: &str) -> Result<ToolName, String> {
        let tool: ToolName = tool_name
            .parse()
            .map_err(|_| format!("Unknown tool: {tool_name:?}"))?;

        if self.is_sealed() {
            return Err("Canvas is sealed -- no further tool calls accepted".to_string());
        }

        if !self.config.allowed_tools.iter().any(|t| t == tool_name) {
            return Err(format!(
                "Tool {tool_name:?} is not allowed in the current tier"
            ));
        }

        if self.tool_calls_executed >= self.config.tool_budget_hard {
            return Err(format!(
                "Tool budget exhausted ({}/{})",
                self.tool_calls_executed, self.config.tool_budget_hard
            ));
        }

        Ok(tool)
    }

    /// Reject any declared coordinate outside the canvas.
    fn check_bounds(&self, invocation: &ToolInvocation) -> Result<(), String> {
        for field in invocation.args().coords() {
            match field.axis {
                Axis::X if field.value >= self.config.canvas_width => {
                    return Err(format!(
                        "Coordinate {}={} is out of bounds (canvas width={})",
                        field.name, field.value, self.config.canvas_width
                    ));
                }
                Axis::Y if field.value >= self.config.canvas_height => {
                    return Err(format!(
                        "Coordinate {}={} is out of bounds (canvas height={})",
                        field.name, field.value, self.config.canvas_height
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Exhaustive compile-time mapping from tool to executor. Adding a
    /// `ToolName` variant without wiring it here is a build error.
    fn dispatch(&mut self, invocation: &ToolInvocation) -> String {
        match invocation {
            ToolInvocation::SetPixel(args) => executors::execute_set_pixel(&mut self.canvas, args),
            ToolInvocation::FillRect(args) => executors::execute_fill_rect(&mut self.canvas, args),
            ToolInvocation::SetPalette(args) => {
                executors::execute_set_palette(&mut self.canvas, args)
            }
            ToolInvocation::SealCanvas(args) => {
                executors::execute_seal_canvas(&mut self.canvas, args)
            }
            ToolInvocation::DrawLine(args) => executors::execute_draw_line(&mut self.canvas, args),
            ToolInvocation::DrawCircle(args) => {
                executors::execute_draw_circle(&mut self.canvas, args)
            }
            ToolInvocation::FloodFill(args) => {
                executors::execute_flood_fill(&mut self.canvas, args)
            }
            ToolInvocation::GradientFill(args) => {
                executors::execute_gradient_fill(&mut self.canvas, args)
            }
            ToolInvocation::Dither(args) => executors::execute_dither(&mut self.canvas, args),
            ToolInvocation::Mirror(args) => executors::execute_mirror(&mut self.canvas, args),
            ToolInvocation::Rotate(args) => executors::execute_rotate(&mut self.canvas, args),
        }
    }
}
