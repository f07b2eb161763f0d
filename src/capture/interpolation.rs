//! Linear resampling between consecutive raw samples at a fixed spacing.

use crate::models::Point;

const ENABLE_LOGS: bool = false;

use crate::log_debug;

pub const DEFAULT_STEP: f64 = 2.0;

/// Upper bound on steps generated for a single move.
pub const MAX_STEPS: usize = 4096;

/// Evenly spaced points from `from` to `to`, `floor(distance / step) + 1` of
/// them, both endpoints included.
///
/// A move shorter than one step collapses to `[from]`. Longer moves are
/// capped at [`MAX_STEPS`] steps, and a distance that overflows to infinity
/// yields just the two endpoints.
pub fn interpolate(from: Point, to: Point, step: f64) -> Vec<Point> {
    let step = if step.is_finite() && step > 0.0 {
        step
    } else {
        DEFAULT_STEP
    };

    let distance = from.distance_to(&to);
    if !distance.is_finite() {
        log_debug!("move distance overflowed, keeping endpoints only");
        return vec![from, to];
    }

    let raw_steps = (distance / step).floor();
    if raw_steps < 1.0 {
        return vec![from];
    }
    let steps = if raw_steps > MAX_STEPS as f64 {
        log_debug!("move of {distance} capped at {MAX_STEPS} steps");
        MAX_STEPS
    } else {
        raw_steps as usize
    };

    let dx = to.x - from.x;
    let dy = to.y - from.y;
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            Point::new(from.x + dx * t, from.y + dy * t)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_returns_single_point() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(interpolate(p, p, DEFAULT_STEP), vec![p]);
    }

    #[test]
    fn test_count_and_endpoints() {
        let p = Point::new(0.0, 0.0);
        let q = Point::new(10.0, 0.0);
        let points = interpolate(p, q, 2.0);

        assert_eq!(points.len(), 6);
        assert_eq!(points[0], p);
        assert_eq!(*points.last().unwrap(), q);
        assert_eq!(points[1], Point::new(2.0, 0.0));
    }

    #[test]
    fn test_uneven_distance_stretches_last_step() {
        let p = Point::new(0.0, 0.0);
        let q = Point::new(3.0, 4.0);
        let points = interpolate(p, q, 2.0);

        assert_eq!(points.len(), 3);
        assert_eq!(points[0], p);
        assert_eq!(points[2], q);
        assert_eq!(points[1], Point::new(1.5, 2.0));
    }

    #[test]
    fn test_short_move_collapses_to_origin() {
        let p = Point::new(1.0, 1.0);
        let q = Point::new(2.0, 1.0);
        assert_eq!(interpolate(p, q, 2.0), vec![p]);
    }

    #[test]
    fn test_overflowing_distance_keeps_endpoints() {
        let p = Point::new(-1e308, 0.0);
        let q = Point::new(1e308, 0.0);
        assert_eq!(interpolate(p, q, 2.0), vec![p, q]);
    }

    #[test]
    fn test_long_move_is_capped() {
        let p = Point::new(0.0, 0.0);
        let q = Point::new(1e9, 0.0);
        let points = interpolate(p, q, 2.0);

        assert_eq!(points.len(), MAX_STEPS + 1);
        assert_eq!(points[0], p);
        assert_eq!(*points.last().unwrap(), q);
    }

    #[test]
    fn test_invalid_step_falls_back_to_default() {
        let p = Point::new(0.0, 0.0);
        let q = Point::new(0.0, 8.0);
        assert_eq!(interpolate(p, q, 0.0).len(), 5);
        assert_eq!(interpolate(p, q, f64::NAN).len(), 5);
    }
}
