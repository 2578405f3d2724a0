//! Executor functions for each drawing tool.
//!
//! Every executor has the signature
//! `(canvas: &mut Canvas, args: &ToolArgs) -> String`.
//!
//! The returned string is a human-readable result message that is fed back
//! to the LLM as the tool-call observation. Executors never fail: malformed
//! input is rejected earlier in the harness pipeline, and the only
//! coordinates reaching them are either fully bounds-checked or explicitly
//! clipped here (circle spans).

use std::collections::VecDeque;

use image::imageops;

use crate::canvas::Canvas;

use super::registry::{
    DitherArgs, DrawCircleArgs, DrawLineArgs, FillRectArgs, FloodFillArgs, GradientDirection,
    GradientFillArgs, MirrorArgs, MirrorAxis, RotateArgs, SealCanvasArgs, SetPaletteArgs,
    SetPixelArgs,
};

pub fn execute_set_pixel(canvas: &mut Canvas, args: &SetPixelArgs) -> String {
    canvas.set(args.x, args.y, [args.r, args.g, args.b]);
    format!(
        "Pixel set at ({}, {}) to ({}, {}, {})",
        args.x, args.y, args.r, args.g, args.b
    )
}

pub fn execute_fill_rect(canvas: &mut Canvas, args: &FillRectArgs) -> String {
    let color = [args.r, args.g, args.b];
    for y in args.y1..=args.y2 {
        for x in args.x1..=args.x2 {
            canvas.set(x, y, color);
        }
    }
    let width = args.x2 - args.x1 + 1;
    let height = args.y2 - args.y1 + 1;
    format!(
        "Filled rect ({},{})-({},{}) ({}x{} px) with ({}, {}, {})",
        args.x1, args.y1, args.x2, args.y2, width, height, args.r, args.g, args.b
    )
}

/// Store the advisory palette hint. It tells the LLM which colors are in
/// play but does not restrict drawing.
pub fn execute_set_palette(canvas: &mut Canvas, args: &SetPaletteArgs) -> String {
    canvas.set_palette_hint(args.colors.clone());
    format!("Palette set with {} colors", args.colors.len())
}

/// Draw a 1-pixel-wide line between two points (Bresenham).
pub fn execute_draw_line(canvas: &mut Canvas, args: &DrawLineArgs) -> String {
    let color = [args.r, args.g, args.b];
    let (mut x0, mut y0) = (i64::from(args.x1), i64::from(args.y1));
    let (x1, y1) = (i64::from(args.x2), i64::from(args.y2));

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        canvas.set(x0 as u32, y0 as u32, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }

    format!(
        "Line drawn from ({},{}) to ({},{}) with color ({}, {}, {})",
        args.x1, args.y1, args.x2, args.y2, args.r, args.g, args.b
    )
}

fn set_clipped(canvas: &mut Canvas, x: i64, y: i64, color: [u8; 3]) {
    if x >= 0 && y >= 0 && x < i64::from(canvas.width()) && y < i64::from(canvas.height()) {
        canvas.set(x as u32, y as u32, color);
    }
}

/// Draw a circle outline (midpoint algorithm) or filled disc.
///
/// Only the center is bounds-checked upstream; the span is clipped at the
/// canvas edges here.
pub fn execute_draw_circle(canvas: &mut Canvas, args: &DrawCircleArgs) -> String {
    let color = [args.r, args.g, args.b];
    let (cx, cy) = (i64::from(args.cx), i64::from(args.cy));
    let radius = i64::from(args.radius);

    if args.fill {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    set_clipped(canvas, cx + dx, cy + dy, color);
                }
            }
        }
    } else {
        let mut x = radius;
        let mut y = 0i64;
        let mut err = 1 - radius;
        while x >= y {
            for (px, py) in [
                (cx + x, cy + y),
                (cx + y, cy + x),
                (cx - y, cy + x),
                (cx - x, cy + y),
                (cx - x, cy - y),
                (cx - y, cy - x),
                (cx + y, cy - x),
                (cx + x, cy - y),
            ] {
                set_clipped(canvas, px, py, color);
            }
            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    let fill_str = if args.fill { "filled" } else { "outline" };
    format!(
        "Circle ({}) at ({},{}) r={} with color ({}, {}, {})",
        fill_str, args.cx, args.cy, args.radius, args.r, args.g, args.b
    )
}

/// Flood-fill the contiguous region around the seed point (4-connectivity).
pub fn execute_flood_fill(canvas: &mut Canvas, args: &FloodFillArgs) -> String {
    let new_color = [args.r, args.g, args.b];
    let message = format!(
        "Flood fill from ({},{}) with color ({}, {}, {})",
        args.x, args.y, args.r, args.g, args.b
    );

    let target = canvas.get(args.x, args.y);
    if target == new_color {
        return message;
    }

    let (w, h) = (canvas.width(), canvas.height());
    let mut queue = VecDeque::new();
    canvas.set(args.x, args.y, new_color);
    queue.push_back((args.x, args.y));

    while let Some((x, y)) = queue.pop_front() {
        let mut neighbors = Vec::with_capacity(4);
        if x > 0 {
            neighbors.push((x - 1, y));
        }
        if x + 1 < w {
            neighbors.push((x + 1, y));
        }
        if y > 0 {
            neighbors.push((x, y - 1));
        }
        if y + 1 < h {
            neighbors.push((x, y + 1));
        }
        for (nx, ny) in neighbors {
            if canvas.get(nx, ny) == target {
                canvas.set(nx, ny, new_color);
                queue.push_back((nx, ny));
            }
        }
    }

    message
}

/// Fill a rectangular region with a linear gradient between two colors.
///
/// Channel values interpolate independently and truncate to integers; a
/// zero-length span degenerates to the start color.
pub fn execute_gradient_fill(canvas: &mut Canvas, args: &GradientFillArgs) -> String {
    let lerp = |c1: u8, c2: u8, t: f32| -> u8 {
        (f32::from(c1) + (f32::from(c2) - f32::from(c1)) * t) as u8
    };

    match args.direction {
        GradientDirection::Horizontal => {
            let span = (args.x2 - args.x1).max(1) as f32;
            for x in args.x1..=args.x2 {
                let t = (x - args.x1) as f32 / span;
                let color = [
                    lerp(args.r1, args.r2, t),
                    lerp(args.g1, args.g2, t),
                    lerp(args.b1, args.b2, t),
                ];
                for y in args.y1..=args.y2 {
                    canvas.set(x, y, color);
                }
            }
        }
        GradientDirection::Vertical => {
            let span = (args.y2 - args.y1).max(1) as f32;
            for y in args.y1..=args.y2 {
                let t = (y - args.y1) as f32 / span;
                let color = [
                    lerp(args.r1, args.r2, t),
                    lerp(args.g1, args.g2, t),
                    lerp(args.b1, args.b2, t),
                ];
                for x in args.x1..=args.x2 {
                    canvas.set(x, y, color);
                }
            }
        }
    }

    format!(
        "Gradient ({}) from ({},{}) to ({},{})",
        args.direction.as_str(),
        args.x1,
        args.y1,
        args.x2,
        args.y2
    )
}

/// Apply a checkerboard dither between two colors.
pub fn execute_dither(canvas: &mut Canvas, args: &DitherArgs) -> String {
    let color1 = [args.r1, args.g1, args.b1];
    let color2 = [args.r2, args.g2, args.b2];
    for y in args.y1..=args.y2 {
        for x in args.x1..=args.x2 {
            canvas.set(x, y, if (x + y) % 2 == 0 { color1 } else { color2 });
        }
    }
    format!(
        "Dither pattern from ({},{}) to ({},{}) between ({},{},{}) and ({},{},{})",
        args.x1, args.y1, args.x2, args.y2, args.r1, args.g1, args.b1, args.r2, args.g2, args.b2
    )
}

/// Mirror (flip) the entire canvas along an axis.
pub fn execute_mirror(canvas: &mut Canvas, args: &MirrorArgs) -> String {
    let flipped = match args.axis {
        MirrorAxis::Horizontal => imageops::flip_horizontal(canvas.image()),
        MirrorAxis::Vertical => imageops::flip_vertical(canvas.image()),
    };
    canvas.replace_image(flipped);
    format!("Canvas mirrored {}ly", args.axis.as_str())
}

/// Rotate the canvas counter-clockwise about its center.
///
/// Nearest-neighbor resampling keeps hard pixel edges; area rotated in from
/// outside the canvas is filled black.
pub fn execute_rotate(canvas: &mut Canvas, args: &RotateArgs) -> String {
    let (w, h) = (canvas.width(), canvas.height());
    let theta = (args.degrees as f32).to_radians();
    let (sin, cos) = theta.sin_cos();
    let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);

    let mut rotated = image::RgbImage::from_pixel(w, h, image::Rgb([0, 0, 0]));
    for y in 0..h {
        for x in 0..w {
            // Inverse mapping: sample the source pixel that lands here.
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let sx = (cos * dx - sin * dy + cx).floor() as i64;
            let sy = (sin * dx + cos * dy + cy).floor() as i64;
            if sx >= 0 && sy >= 0 && sx < i64::from(w) && sy < i64::from(h) {
                rotated.put_pixel(x, y, image::Rgb(canvas.get(sx as u32, sy as u32)));
            }
        }
    }
    canvas.replace_image(rotated);

    format!("Canvas rotated {} degrees", args.degrees)
}

/// Mark the canvas as sealed.
///
/// Seal bookkeeping is handled by the harness; this executor only returns
/// the confirmation message.
pub fn execute_seal_canvas(_canvas: &mut Canvas, _args: &SealCanvasArgs) -> String {
    "Canvas sealed".to_string()
}
