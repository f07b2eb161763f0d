use crate::models::{MotionReading, Sample, StrokeColor};

const ENABLE_LOGS: bool = false;

use crate::log_debug;

/// Pressure at which the red channel saturates.
pub const PRESSURE_SATURATION: f64 = 0.8;
const FIXED_GREEN: f64 = 0.4;
const FIXED_BLUE: f64 = 0.4;

/// Velocity and jerk between two consecutive samples.
///
/// A non-positive (or NaN) time delta yields a zero reading instead of
/// dividing by it.
pub fn estimate(previous: &Sample, previous_velocity: f64, current: &Sample) -> MotionReading {
    let distance = current.position.distance_to(&previous.position);
    let dt = current.timestamp - previous.timestamp;

    if !(dt > 0.0) {
        log_debug!("degenerate sample pair (dt={dt}), emitting zero reading");
        return MotionReading {
            velocity: 0.0,
            jerk: 0.0,
            pressure: current.pressure,
        };
    }

    let velocity = distance / dt;
    let jerk = (velocity - previous_velocity) / dt;

    MotionReading {
        velocity,
        jerk,
        pressure: current.pressure,
    }
}

/// Red ramps with pressure up to 80% force; green and blue stay fixed.
pub fn pressure_color(pressure: f64) -> StrokeColor {
    let red = (pressure / PRESSURE_SATURATION).clamp(0.0, 1.0);
    let red = if red.is_nan() { 0.0 } else { red };
    StrokeColor::new(red, FIXED_GREEN, FIXED_BLUE)
}

/// Carries the previous velocity across the samples of one stroke.
#[derive(Debug, Default)]
pub struct KinematicEstimator {
    previous_velocity: f64,
}

impl KinematicEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, previous: &Sample, current: &Sample) -> MotionReading {
        let reading = estimate(previous, self.previous_velocity, current);
        self.previous_velocity = reading.velocity;
        reading
    }

    pub fn previous_velocity(&self) -> f64 {
        self.previous_velocity
    }

    pub fn reset(&mut self) {
        self.previous_velocity = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_velocity_and_jerk_from_consecutive_samples() {
        let a = Sample::new(0.0, 0.0, 0.2, 0.0);
        let b = Sample::new(3.0, 4.0, 0.5, 0.5);

        let reading = estimate(&a, 2.0, &b);
        assert!(approx(reading.velocity, 10.0));
        assert!(approx(reading.jerk, 16.0));
        assert_eq!(reading.pressure, 0.5);
    }

    #[test]
    fn test_non_positive_dt_yields_zero_reading() {
        let a = Sample::new(0.0, 0.0, 0.2, 1.0);
        let same_time = Sample::new(5.0, 0.0, 0.3, 1.0);
        let earlier = Sample::new(5.0, 0.0, 0.3, 0.5);

        for current in [same_time, earlier] {
            let reading = estimate(&a, 42.0, &current);
            assert_eq!(reading.velocity, 0.0);
            assert_eq!(reading.jerk, 0.0);
            assert_eq!(reading.pressure, 0.3);
        }
    }

    #[test]
    fn test_estimator_carries_velocity_and_resets() {
        let mut estimator = KinematicEstimator::new();
        let s0 = Sample::new(0.0, 0.0, 0.2, 0.0);
        let s1 = Sample::new(10.0, 0.0, 0.5, 0.1);
        let s2 = Sample::new(30.0, 0.0, 0.8, 0.2);

        let r1 = estimator.update(&s0, &s1);
        assert!(approx(r1.velocity, 100.0));
        assert!(approx(r1.jerk, 1000.0));

        let r2 = estimator.update(&s1, &s2);
        assert!(approx(r2.velocity, 200.0));
        assert!(approx(r2.jerk, 1000.0));

        estimator.reset();
        assert_eq!(estimator.previous_velocity(), 0.0);
    }

    #[test]
    fn test_pressure_color_endpoints_and_saturation() {
        assert_eq!(pressure_color(0.0), StrokeColor::new(0.0, 0.4, 0.4));
        assert_eq!(pressure_color(0.8), StrokeColor::new(1.0, 0.4, 0.4));
        assert_eq!(pressure_color(1.0), StrokeColor::new(1.0, 0.4, 0.4));
        assert!(approx(pressure_color(0.4).red, 0.5));
    }

    #[test]
    fn test_pressure_color_is_monotonic() {
        let mut last = -1.0;
        for i in 0..=100 {
            let red = pressure_color(i as f64 / 100.0).red;
            assert!(red >= last);
            last = red;
        }
    }
}
