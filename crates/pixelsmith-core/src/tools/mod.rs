//! The drawing-tool engine: schemas, executors, and the validation harness.

pub mod executors;
pub mod harness;
pub mod registry;

pub use harness::{HarnessConfig, HarnessState, ToolCallOutcome, ToolHarness};
pub use registry::{ToolInvocation, ToolName};
