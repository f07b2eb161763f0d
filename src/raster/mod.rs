//! Raster output for submission and pressure visualization.
//!
//! Stroke geometry goes through tiny-skia; the result is flattened into an
//! opaque `image::RgbImage` before PNG encoding so no alpha reaches the
//! scoring service.

pub mod color_map;
pub mod drawing;
pub mod encode;

pub use color_map::rasterize_color_map;
pub use drawing::{rasterize, rasterize_with};
pub use encode::{encode_png, encode_png_rgba};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Image size the scoring model expects.
pub const SUBMISSION_SIZE: RasterSize = RasterSize {
    width: 299,
    height: 299,
};

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RasterError {
    #[error("drawing has no extent to rasterize")]
    EmptyDrawing,

    #[error("target size {width}x{height} has zero extent")]
    ZeroTarget { width: u32, height: u32 },

    #[error("failed to create raster canvas: {0}")]
    Canvas(String),

    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterSize {
    pub width: u32,
    pub height: u32,
}

impl RasterSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn ensure_non_zero(&self) -> Result<(), RasterError> {
        if self.width == 0 || self.height == 0 {
            return Err(RasterError::ZeroTarget {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterOptions {
    pub size: RasterSize,
    /// Fill behind the ink. Defaults to black, which is what an opaque
    /// conversion of a transparent ink render produces.
    pub background: [u8; 3],
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            size: SUBMISSION_SIZE,
            background: [0, 0, 0],
        }
    }
}
