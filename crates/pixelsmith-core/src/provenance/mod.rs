//! Artifact provenance: authenticity seals and pixel watermarks.

pub mod seal;
pub mod watermark;

pub use seal::{Seal, SealError, SealKeyring, SealMetadata};
pub use watermark::{WatermarkError, WATERMARK_BITS};
