//! LSB steganographic watermark for pixel-art provenance.
//!
//! Embeds `artifact_id` and `owner_id` (two UUIDs, 32 bytes = 256 bits)
//! into the least-significant bit of the red channel of the first 256
//! pixels in raster order (row-major, left-to-right, top-to-bottom). Every
//! other bit of the image is left untouched, so the visual perturbation is
//! at most one red level on 256 pixels.
//!
//! The watermark is independent of the authenticity seal: the seal proves
//! integrity, the watermark survives inside the pixels themselves.

use uuid::Uuid;

use crate::canvas::Canvas;

/// Bits required to carry both identifiers.
pub const WATERMARK_BITS: u64 = 256;

/// Errors from watermark operations.
#[derive(Debug, thiserror::Error)]
pub enum WatermarkError {
    /// The canvas cannot hold a complete watermark. A partial embed would
    /// not be recoverable, so this fails instead of truncating.
    #[error("canvas too small for watermark: {pixels} pixels, need {WATERMARK_BITS}")]
    CanvasTooSmall { pixels: u64 },
}

/// Embed both identifiers into the canvas in place.
pub fn encode(
    canvas: &mut Canvas,
    artifact_id: Uuid,
    owner_id: Uuid,
) -> Result<(), WatermarkError> {
    if canvas.pixel_count() < WATERMARK_BITS {
        return Err(WatermarkError::CanvasTooSmall {
            pixels: canvas.pixel_count(),
        });
    }

    let mut data = [0u8; 32];
    data[..16].copy_from_slice(artifact_id.as_bytes());
    data[16..].copy_from_slice(owner_id.as_bytes());

    let width = canvas.width();
    for bit_idx in 0..WATERMARK_BITS {
        let x = (bit_idx % u64::from(width)) as u32;
        let y = (bit_idx / u64::from(width)) as u32;
        let bit = (data[(bit_idx / 8) as usize] >> (7 - bit_idx % 8)) & 1;

        let [r, g, b] = canvas.get(x, y);
        canvas.set(x, y, [(r & 0xFE) | bit, g, b]);
    }
    Ok(())
}

/// Extract the embedded identifiers.
pub fn decode(canvas: &Canvas) -> Result<(Uuid, Uuid), WatermarkError> {
    if canvas.pixel_count() < WATERMARK_BITS {
        return Err(WatermarkError::CanvasTooSmall {
            pixels: canvas.pixel_count(),
        });
    }

    let mut data = [0u8; 32];
    let width = canvas.width();
    for bit_idx in 0..WATERMARK_BITS {
        let x = (bit_idx % u64::from(width)) as u32;
        let y = (bit_idx / u64::from(width)) as u32;
        let bit = canvas.get(x, y)[0] & 1;
        data[(bit_idx / 8) as usize] |= bit << (7 - bit_idx % 8);
    }

    let mut artifact_bytes = [0u8; 16];
    let mut owner_bytes = [0u8; 16];
    artifact_bytes.copy_from_slice(&data[..16]);
    owner_bytes.copy_from_slice(&data[16..]);
    Ok((
        Uuid::from_bytes(artifact_bytes),
        Uuid::from_bytes(owner_bytes),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noisy_canvas(w: u32, h: u32) -> Canvas {
        let mut canvas = Canvas::new(w, h);
        for y in 0..h {
            for x in 0..w {
                canvas.set(
                    x,
                    y,
                    [
                        ((x * 31 + y * 7) % 256) as u8,
                        ((x * 13 + y * 3) % 256) as u8,
                        ((x * 5 + y * 17) % 256) as u8,
                    ],
                );
            }
        }
        canvas
    }

    #[test]
    fn roundtrip_recovers_both_ids() {
        let mut canvas = noisy_canvas(32, 32);
        let artifact_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();

        encode(&mut canvas, artifact_id, owner_id).unwrap();
        assert_eq!(decode(&canvas).unwrap(), (artifact_id, owner_id));
    }

    #[test]
    fn roundtrip_on_minimum_canvas() {
        // Exactly 256 pixels.
        let mut canvas = noisy_canvas(16, 16);
        let artifact_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        encode(&mut canvas, artifact_id, owner_id).unwrap();
        assert_eq!(decode(&canvas).unwrap(), (artifact_id, owner_id));
    }

    #[test]
    fn only_red_lsb_of_first_256_pixels_changes() {
        let original = noisy_canvas(32, 32);
        let mut canvas = original.clone();
        encode(&mut canvas, Uuid::new_v4(), Uuid::new_v4()).unwrap();

        for y in 0..32 {
            for x in 0..32 {
                let [r0, g0, b0] = original.get(x, y);
                let [r1, g1, b1] = canvas.get(x, y);
                assert_eq!(g0, g1);
                assert_eq!(b0, b1);
                assert_eq!(r0 & 0xFE, r1 & 0xFE);
                if u64::from(y) * 32 + u64::from(x) >= WATERMARK_BITS {
                    assert_eq!(r0, r1);
                }
            }
        }
    }

    #[test]
    fn undersized_canvas_is_rejected_not_truncated() {
        let mut canvas = noisy_canvas(8, 8);
        let err = encode(&mut canvas, Uuid::new_v4(), Uuid::new_v4()).unwrap_err();
        assert!(matches!(
            err,
            WatermarkError::CanvasTooSmall { pixels: 64 }
        ));
        assert!(decode(&canvas).is_err());
    }

    #[test]
    fn roundtrip_survives_png_reencode() {
        use crate::canvas::codec;

        let mut canvas = noisy_canvas(32, 32);
        let artifact_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        encode(&mut canvas, artifact_id, owner_id).unwrap();

        let blob = codec::checkpoint(&canvas).unwrap();
        let restored = codec::restore(&blob).unwrap();
        assert_eq!(decode(&restored).unwrap(), (artifact_id, owner_id));
    }
}
