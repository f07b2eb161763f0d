use image::{Rgba, RgbaImage};

use crate::models::ColoredPoint;

use super::{RasterError, RasterSize};

/// Paint each logged point as a single opaque pixel at its canvas position.
///
/// Unlike [`super::rasterize`] nothing is scaled; points that fall outside
/// `size` are skipped and untouched pixels stay transparent.
pub fn rasterize_color_map(
    points: &[ColoredPoint],
    size: RasterSize,
) -> Result<RgbaImage, RasterError> {
    size.ensure_non_zero()?;

    let mut image = RgbaImage::new(size.width, size.height);
    for point in points {
        let x = point.position.x.floor();
        let y = point.position.y.floor();
        if !(x >= 0.0 && y >= 0.0 && x < size.width as f64 && y < size.height as f64) {
            continue;
        }
        let [r, g, b] = point.color().to_rgb8();
        image.put_pixel(x as u32, y as u32, Rgba([r, g, b, 255]));
    }

    Ok(image)
}
