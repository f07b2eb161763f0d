use image::{Rgb, RgbImage};
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::models::{Bounds, Drawing, Segment};

use super::{RasterError, RasterOptions, RasterSize};

/// Render `drawing` into a `size` image on the default background.
pub fn rasterize(drawing: &Drawing, size: RasterSize) -> Result<RgbImage, RasterError> {
    rasterize_with(
        drawing,
        &RasterOptions {
            size,
            ..RasterOptions::default()
        },
    )
}

/// Scale the drawing's ink bounds to fit the target (aspect preserved,
/// centered) and flatten to opaque RGB.
pub fn rasterize_with(drawing: &Drawing, options: &RasterOptions) -> Result<RgbImage, RasterError> {
    let size = options.size;
    size.ensure_non_zero()?;

    let bounds = drawing
        .bounds()
        .filter(|b| b.width() > 0.0 && b.height() > 0.0 && b.width().is_finite() && b.height().is_finite())
        .ok_or(RasterError::EmptyDrawing)?;

    let mut pixmap = Pixmap::new(size.width, size.height)
        .ok_or_else(|| RasterError::Canvas(format!("{}x{}", size.width, size.height)))?;
    let [r, g, b] = options.background;
    pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, 255));

    let transform = fit_transform(&bounds, size);
    for segment in drawing.strokes.iter().flat_map(|s| s.segments.iter()) {
        draw_segment(&mut pixmap, segment, transform);
    }

    Ok(flatten(&pixmap))
}

/// Maps canvas coordinates into the target so the bounds are scaled by
/// `min(tw/sw, th/sh)` and centered.
fn fit_transform(bounds: &Bounds, size: RasterSize) -> Transform {
    let target_w = size.width as f64;
    let target_h = size.height as f64;
    let scale = (target_w / bounds.width()).min(target_h / bounds.height());

    let origin_x = (target_w - bounds.width() * scale) / 2.0;
    let origin_y = (target_h - bounds.height() * scale) / 2.0;

    Transform::from_row(
        scale as f32,
        0.0,
        0.0,
        scale as f32,
        (origin_x - bounds.min_x * scale) as f32,
        (origin_y - bounds.min_y * scale) as f32,
    )
}

fn draw_segment(pixmap: &mut Pixmap, segment: &Segment, transform: Transform) {
    let Some(first) = segment.points.first() else {
        return;
    };

    let mut paint = Paint::default();
    let [r, g, b] = segment.color.to_rgb8();
    let alpha = (segment.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    paint.set_color_rgba8(r, g, b, alpha);
    paint.anti_alias = true;

    let is_dot = segment
        .points
        .iter()
        .all(|cp| cp.location.distance_to(&first.location) < f64::EPSILON);

    if is_dot {
        let radius = (segment.width / 2.0) as f32;
        if let Some(circle) =
            PathBuilder::from_circle(first.location.x as f32, first.location.y as f32, radius)
        {
            pixmap.fill_path(&circle, &paint, FillRule::Winding, transform, None);
        }
        return;
    }

    let mut builder = PathBuilder::new();
    builder.move_to(first.location.x as f32, first.location.y as f32);
    for cp in &segment.points[1..] {
        builder.line_to(cp.location.x as f32, cp.location.y as f32);
    }
    let Some(path) = builder.finish() else {
        return;
    };

    let stroke = Stroke {
        width: segment.width as f32,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, transform, None);
}

fn flatten(pixmap: &Pixmap) -> RgbImage {
    let mut out = RgbImage::new(pixmap.width(), pixmap.height());
    for (pixel, color) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = color.demultiply();
        *pixel = Rgb([c.red(), c.green(), c.blue()]);
    }
    out
}
