use std::io::Cursor;

use image::{ImageFormat, RgbImage, RgbaImage};

use super::RasterError;

/// Lossless PNG bytes for the submission image.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, RasterError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

pub fn encode_png_rgba(image: &RgbaImage) -> Result<Vec<u8>, RasterError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}
