use serde::Serialize;

use crate::capture::{
    interpolate, pressure_color, CaptureLog, Filtered, KinematicEstimator, SampleFilter,
    StrokeAccumulator,
};
use crate::models::{ColoredPoint, ControlPoint, Drawing, MotionReading, PointerEvent, Sample};
use crate::settings::CaptureSettings;

/// Owned, read-only copy of a session's state at one instant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSnapshot {
    pub drawing: Drawing,
    pub readings: Vec<MotionReading>,
    pub colored_points: Vec<ColoredPoint>,
}

/// State of one prompt's drawing attempt.
///
/// Every pointer event is applied to completion by [`CaptureSession::handle_pointer`];
/// undo and reset take `&mut self`, so they never interleave with a
/// half-applied move.
pub struct CaptureSession {
    filter: SampleFilter,
    estimator: KinematicEstimator,
    accumulator: StrokeAccumulator,
    log: CaptureLog,
    colored_points: Vec<ColoredPoint>,
    interpolation_step: f64,
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new(&CaptureSettings::default())
    }
}

impl CaptureSession {
    pub fn new(settings: &CaptureSettings) -> Self {
        let log = match settings.log_capacity {
            Some(capacity) => CaptureLog::bounded(capacity),
            None => CaptureLog::new(),
        };

        Self {
            filter: SampleFilter::new(),
            estimator: KinematicEstimator::new(),
            accumulator: StrokeAccumulator::new(settings.stroke_grouping, settings.brush_width),
            log,
            colored_points: Vec::new(),
            interpolation_step: settings.interpolation_step,
        }
    }

    /// Apply one pointer event. Returns the reading it produced, if any.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<MotionReading> {
        match self.filter.observe(event) {
            Filtered::StrokeStarted => {
                self.estimator.reset();
                self.accumulator.begin_gesture();
                None
            }
            Filtered::Origin(_) => {
                self.estimator.reset();
                None
            }
            Filtered::Motion { previous, current } => Some(self.apply_motion(&previous, &current)),
            Filtered::StrokeEnded => {
                self.estimator.reset();
                self.accumulator.end_gesture();
                None
            }
            Filtered::Rejected(_) => None,
        }
    }

    fn apply_motion(&mut self, previous: &Sample, current: &Sample) -> MotionReading {
        let reading = self.estimator.update(previous, current);
        let color = pressure_color(current.pressure);
        let time_offset = (current.timestamp - previous.timestamp).max(0.0);
        let brush_width = self.accumulator.brush_width();
        let (azimuth, altitude) = current
            .orientation
            .map(|o| (Some(o.azimuth), Some(o.altitude)))
            .unwrap_or((None, None));

        let points = interpolate(previous.position, current.position, self.interpolation_step);
        self.colored_points
            .extend(points.iter().map(|&p| ColoredPoint::new(p, color)));
        self.accumulator.stage(points.into_iter().map(|location| ControlPoint {
            location,
            time_offset,
            size: brush_width,
            opacity: 1.0,
            force: current.pressure,
            azimuth,
            altitude,
        }));
        self.accumulator.commit(color);

        self.log.append(reading);
        reading
    }

    /// Remove the most recent stroke; false when the drawing is empty.
    pub fn undo(&mut self) -> bool {
        self.accumulator.undo()
    }

    /// Clear drawing, log, colored points and in-progress stroke state.
    pub fn reset(&mut self) {
        self.accumulator.reset();
        self.log.clear();
        self.colored_points.clear();
        self.filter.reset();
        self.estimator.reset();
    }

    pub fn current_drawing(&self) -> Drawing {
        self.accumulator.current_drawing()
    }

    pub fn drawing(&self) -> &Drawing {
        self.accumulator.drawing()
    }

    pub fn capture_log(&self) -> &CaptureLog {
        &self.log
    }

    pub fn readings(&self) -> Vec<MotionReading> {
        self.log.as_sequence()
    }

    pub fn colored_points(&self) -> &[ColoredPoint] {
        &self.colored_points
    }

    pub fn snapshot(&self) -> CaptureSnapshot {
        CaptureSnapshot {
            drawing: self.current_drawing(),
            readings: self.readings(),
            colored_points: self.colored_points.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::StrokeGrouping;

    fn stroke(session: &mut CaptureSession, samples: &[(f64, f64, f64, f64)]) -> Vec<MotionReading> {
        let (x, y, _, t) = samples[0];
        session.handle_pointer(PointerEvent::down(x, y, 0.0, t));
        let readings = samples
            .iter()
            .filter_map(|&(x, y, p, t)| session.handle_pointer(PointerEvent::moved(x, y, p, t)))
            .collect();
        let (x, y, _, t) = *samples.last().unwrap();
        session.handle_pointer(PointerEvent::up(x, y, t));
        readings
    }

    #[test]
    fn test_reference_stroke_readings() {
        let mut session = CaptureSession::default();
        let readings = stroke(
            &mut session,
            &[(0.0, 0.0, 0.2, 0.0), (10.0, 0.0, 0.5, 0.1), (20.0, 0.0, 0.8, 0.2)],
        );

        assert_eq!(readings.len(), 2);
        assert!((readings[0].velocity - 100.0).abs() < 1e-9);
        assert!((readings[0].jerk - 1000.0).abs() < 1e-6);
        assert!((readings[1].velocity - 100.0).abs() < 1e-9);
        assert!(readings[1].jerk.abs() < 1e-6);
        assert_eq!(session.capture_log().len(), 2);

        // 6 interpolated points per 10-unit move at step 2.
        assert_eq!(session.colored_points().len(), 12);
        let drawing = session.current_drawing();
        assert_eq!(drawing.stroke_count(), 1);
        assert_eq!(drawing.segment_count(), 2);
        assert_eq!(drawing.strokes[0].segments[0].points.len(), 6);
        assert_eq!(drawing.strokes[0].segments[1].color.red, 1.0);
    }

    #[test]
    fn test_each_stroke_starts_without_velocity_history() {
        let mut session = CaptureSession::default();
        stroke(&mut session, &[(0.0, 0.0, 0.5, 0.0), (10.0, 0.0, 0.5, 0.1)]);
        let second = stroke(&mut session, &[(0.0, 10.0, 0.5, 1.0), (5.0, 10.0, 0.5, 1.1)]);

        // jerk measured from zero, not from the first stroke's velocity
        assert!((second[0].velocity - 50.0).abs() < 1e-9);
        assert!((second[0].jerk - 500.0).abs() < 1e-6);
        assert_eq!(session.capture_log().len(), 2);
    }

    #[test]
    fn test_per_segment_policy_undo_removes_one_move() {
        let settings = CaptureSettings {
            stroke_grouping: StrokeGrouping::PerSegment,
            ..CaptureSettings::default()
        };
        let mut session = CaptureSession::new(&settings);
        stroke(
            &mut session,
            &[(0.0, 0.0, 0.2, 0.0), (10.0, 0.0, 0.5, 0.1), (20.0, 0.0, 0.8, 0.2)],
        );
        assert_eq!(session.drawing().stroke_count(), 2);
        assert!(session.undo());
        assert_eq!(session.drawing().stroke_count(), 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = CaptureSession::default();
        stroke(&mut session, &[(0.0, 0.0, 0.5, 0.0), (10.0, 0.0, 0.5, 0.1)]);
        session.reset();

        assert!(session.current_drawing().is_empty());
        assert!(session.readings().is_empty());
        assert!(session.colored_points().is_empty());
        assert!(!session.undo());
    }

    #[test]
    fn test_reset_mid_gesture_makes_next_move_an_origin() {
        let mut session = CaptureSession::default();
        session.handle_pointer(PointerEvent::down(0.0, 0.0, 0.5, 0.0));
        session.handle_pointer(PointerEvent::moved(0.0, 0.0, 0.5, 0.0));
        session.handle_pointer(PointerEvent::moved(10.0, 0.0, 0.5, 0.1));
        session.reset();

        assert!(session
            .handle_pointer(PointerEvent::moved(20.0, 0.0, 0.5, 0.2))
            .is_none());
        assert!(session.current_drawing().is_empty());
    }

    #[test]
    fn test_orientation_is_carried_into_control_points() {
        let mut session = CaptureSession::default();
        session.handle_pointer(PointerEvent::down(0.0, 0.0, 0.5, 0.0));
        session.handle_pointer(PointerEvent::moved(0.0, 0.0, 0.5, 0.0));
        session.handle_pointer(PointerEvent::moved(4.0, 0.0, 0.6, 0.05).with_orientation(1.2, 0.7));

        let drawing = session.current_drawing();
        let cp = drawing.strokes[0].segments[0].points[0];
        assert_eq!(cp.azimuth, Some(1.2));
        assert_eq!(cp.altitude, Some(0.7));
        assert_eq!(cp.force, 0.6);
        assert!((cp.time_offset - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_timing_still_draws() {
        let mut session = CaptureSession::default();
        let readings = stroke(&mut session, &[(0.0, 0.0, 0.5, 1.0), (6.0, 0.0, 0.5, 1.0)]);
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].velocity, 0.0);
        assert_eq!(readings[0].jerk, 0.0);
        assert_eq!(session.drawing().segment_count(), 1);
    }

    #[test]
    fn test_far_apart_samples_do_not_panic() {
        let mut session = CaptureSession::default();
        session.handle_pointer(PointerEvent::down(-1e308, 0.0, 0.5, 0.0));
        session.handle_pointer(PointerEvent::moved(-1e308, 0.0, 0.5, 0.0));
        let reading = session.handle_pointer(PointerEvent::moved(1e308, 0.0, 0.5, 0.1));

        assert!(reading.is_some());
        assert_eq!(session.colored_points().len(), 2);
        let drawing = session.current_drawing();
        assert_eq!(drawing.strokes[0].segments[0].points.len(), 2);
        assert!(crate::raster::rasterize(&drawing, crate::raster::SUBMISSION_SIZE).is_err());
    }
}
