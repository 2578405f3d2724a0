//! The in-memory RGB canvas.
//!
//! A `Canvas` is a bounded width×height grid of RGB triples with origin at
//! the top-left. It is owned exclusively by the tool harness for the
//! duration of a run; dimensions never change after creation.

pub mod codec;

pub use codec::CodecError;

use image::{Rgb, RgbImage};

/// Bounded RGB pixel grid plus an advisory palette hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    image: RgbImage,
    palette_hint: Option<Vec<[u8; 3]>>,
}

impl Canvas {
    /// Create a black canvas of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, Rgb([0, 0, 0])),
            palette_hint: None,
        }
    }

    /// Wrap an existing image buffer.
    pub fn from_image(image: RgbImage) -> Self {
        Self {
            image,
            palette_hint: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// Read the pixel at (x, y). Caller guarantees bounds.
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        self.image.get_pixel(x, y).0
    }

    /// Write the pixel at (x, y). Caller guarantees bounds.
    pub fn set(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        self.image.put_pixel(x, y, Rgb(rgb));
    }

    /// Borrow the underlying image buffer.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Replace the underlying buffer with a same-sized transform result.
    pub fn replace_image(&mut self, image: RgbImage) {
        debug_assert_eq!(
            (image.width(), image.height()),
            (self.width(), self.height()),
            "canvas dimensions are fixed for a job's lifetime"
        );
        self.image = image;
    }

    /// Store the advisory palette. Never constrains drawing.
    pub fn set_palette_hint(&mut self, colors: Vec<[u8; 3]>) {
        self.palette_hint = Some(colors);
    }

    pub fn palette_hint(&self) -> Option<&[[u8; 3]]> {
        self.palette_hint.as_deref()
    }
}
