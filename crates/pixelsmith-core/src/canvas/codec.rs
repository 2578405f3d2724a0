//! Canvas serialization: checkpoints, final export, thumbnails.
//!
//! Checkpoints are gzip-wrapped PNG so intermediate snapshots stay small
//! enough for a database BLOB column; the delivered artifact is plain PNG.
//! All paths are lossless — pixel art survives every round-trip bit-exact.

use std::io::{Cursor, Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use image::imageops::{self, FilterType};
use image::ImageFormat;

use super::Canvas;

/// Errors from canvas encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("image codec failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;

/// Encode the canvas as PNG bytes (the delivered artifact format).
pub fn export_png(canvas: &Canvas) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    canvas.image().write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Serialize the canvas to a gzip-compressed PNG checkpoint blob.
pub fn checkpoint(canvas: &Canvas) -> Result<Vec<u8>> {
    let png = export_png(canvas)?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&png)?;
    Ok(encoder.finish()?)
}

/// Rebuild a canvas from a checkpoint blob.
pub fn restore(data: &[u8]) -> Result<Canvas> {
    let mut decoder = GzDecoder::new(data);
    let mut png = Vec::new();
    decoder.read_to_end(&mut png)?;
    let image = image::load_from_memory_with_format(&png, ImageFormat::Png)?.to_rgb8();
    Ok(Canvas::from_image(image))
}

/// Downscale to fit `max_size` and re-encode as PNG.
///
/// Nearest-neighbor keeps hard pixel edges; aspect ratio is preserved and
/// the canvas is never upscaled.
pub fn thumbnail(canvas: &Canvas, max_size: u32) -> Result<Vec<u8>> {
    let (w, h) = (canvas.width(), canvas.height());
    let scale = (f64::from(max_size) / f64::from(w))
        .min(f64::from(max_size) / f64::from(h))
        .min(1.0);
    let tw = ((f64::from(w) * scale).round() as u32).max(1);
    let th = ((f64::from(h) * scale).round() as u32).max(1);

    let thumb = imageops::resize(canvas.image(), tw, th, FilterType::Nearest);
    let mut buf = Cursor::new(Vec::new());
    thumb.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}
