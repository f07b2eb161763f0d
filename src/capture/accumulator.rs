use serde::{Deserialize, Serialize};

use crate::models::{ControlPoint, Drawing, Segment, Stroke, StrokeColor};
use crate::models::drawing::DEFAULT_BRUSH_WIDTH;

/// How segments are grouped into undoable strokes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StrokeGrouping {
    /// Every segment between pointer-down and pointer-up shares one stroke,
    /// so undo removes the whole gesture.
    #[default]
    PerGesture,
    /// Every pointer-move segment is its own stroke entry; undo removes only
    /// the most recent short segment.
    PerSegment,
}

/// Owns the drawing of the current capture session.
pub struct StrokeAccumulator {
    drawing: Drawing,
    grouping: StrokeGrouping,
    brush_width: f64,
    staged: Vec<ControlPoint>,
    /// True while the last stroke still belongs to the active gesture.
    gesture_open: bool,
}

impl Default for StrokeAccumulator {
    fn default() -> Self {
        Self::new(StrokeGrouping::default(), DEFAULT_BRUSH_WIDTH)
    }
}

impl StrokeAccumulator {
    pub fn new(grouping: StrokeGrouping, brush_width: f64) -> Self {
        Self {
            drawing: Drawing::default(),
            grouping,
            brush_width,
            staged: Vec::new(),
            gesture_open: false,
        }
    }

    pub fn grouping(&self) -> StrokeGrouping {
        self.grouping
    }

    pub fn brush_width(&self) -> f64 {
        self.brush_width
    }

    pub fn begin_gesture(&mut self) {
        self.staged.clear();
        self.gesture_open = false;
    }

    /// Pointer lifted: anything staged but not committed is dropped.
    pub fn end_gesture(&mut self) {
        self.staged.clear();
        self.gesture_open = false;
    }

    pub fn stage(&mut self, points: impl IntoIterator<Item = ControlPoint>) {
        self.staged.extend(points);
    }

    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Turn the staged control points into one segment of `color`.
    pub fn commit(&mut self, color: StrokeColor) {
        if self.staged.is_empty() {
            return;
        }
        let points = std::mem::take(&mut self.staged);
        let segment = Segment::new(points, color, self.brush_width);

        match self.grouping {
            StrokeGrouping::PerGesture if self.gesture_open => {
                if let Some(stroke) = self.drawing.strokes.last_mut() {
                    stroke.segments.push(segment);
                } else {
                    self.drawing.strokes.push(Stroke::new(segment));
                }
            }
            StrokeGrouping::PerGesture => {
                self.drawing.strokes.push(Stroke::new(segment));
                self.gesture_open = true;
            }
            StrokeGrouping::PerSegment => {
                self.drawing.strokes.push(Stroke::new(segment));
            }
        }
    }

    pub fn append_segment(&mut self, points: Vec<ControlPoint>, color: StrokeColor) {
        self.stage(points);
        self.commit(color);
    }

    /// Remove the most recent stroke. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let removed = self.drawing.strokes.pop().is_some();
        // Further moves of an in-progress gesture start a fresh stroke rather
        // than extending whatever stroke is now last.
        self.gesture_open = false;
        removed
    }

    pub fn reset(&mut self) {
        self.drawing.strokes.clear();
        self.staged.clear();
        self.gesture_open = false;
    }

    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    pub fn current_drawing(&self) -> Drawing {
        self.drawing.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    fn points(n: usize) -> Vec<ControlPoint> {
        (0..n)
            .map(|i| ControlPoint {
                location: Point::new(i as f64, 0.0),
                time_offset: 0.01,
                size: DEFAULT_BRUSH_WIDTH,
                opacity: 1.0,
                force: 0.5,
                azimuth: None,
                altitude: None,
            })
            .collect()
    }

    fn red() -> StrokeColor {
        StrokeColor::new(1.0, 0.4, 0.4)
    }

    #[test]
    fn test_per_gesture_groups_segments_until_pointer_up() {
        let mut acc = StrokeAccumulator::new(StrokeGrouping::PerGesture, 5.0);
        acc.begin_gesture();
        acc.append_segment(points(3), red());
        acc.append_segment(points(2), red());
        acc.end_gesture();

        acc.begin_gesture();
        acc.append_segment(points(4), red());
        acc.end_gesture();

        let drawing = acc.current_drawing();
        assert_eq!(drawing.stroke_count(), 2);
        assert_eq!(drawing.strokes[0].segments.len(), 2);
        assert_eq!(drawing.strokes[1].segments.len(), 1);

        assert!(acc.undo());
        assert_eq!(acc.drawing().stroke_count(), 1);
        assert_eq!(acc.drawing().segment_count(), 2);
    }

    #[test]
    fn test_per_segment_makes_one_stroke_per_move() {
        let mut acc = StrokeAccumulator::new(StrokeGrouping::PerSegment, 5.0);
        acc.begin_gesture();
        acc.append_segment(points(3), red());
        acc.append_segment(points(2), red());
        acc.end_gesture();

        assert_eq!(acc.drawing().stroke_count(), 2);
        assert!(acc.undo());
        assert_eq!(acc.drawing().stroke_count(), 1);
        assert_eq!(acc.drawing().strokes[0].point_count(), 3);
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut acc = StrokeAccumulator::default();
        assert!(!acc.undo());
        assert!(acc.drawing().is_empty());
    }

    #[test]
    fn test_undo_mid_gesture_starts_new_stroke() {
        let mut acc = StrokeAccumulator::new(StrokeGrouping::PerGesture, 5.0);
        acc.begin_gesture();
        acc.append_segment(points(2), red());
        acc.end_gesture();

        acc.begin_gesture();
        acc.append_segment(points(2), red());
        assert!(acc.undo());
        acc.append_segment(points(2), red());
        acc.end_gesture();

        let drawing = acc.drawing();
        assert_eq!(drawing.stroke_count(), 2);
        assert_eq!(drawing.strokes[0].segments.len(), 1);
        assert_eq!(drawing.strokes[1].segments.len(), 1);
    }

    #[test]
    fn test_end_gesture_discards_staged_points() {
        let mut acc = StrokeAccumulator::default();
        acc.begin_gesture();
        acc.stage(points(4));
        assert_eq!(acc.staged_len(), 4);
        acc.end_gesture();
        assert_eq!(acc.staged_len(), 0);
        acc.commit(red());
        assert!(acc.drawing().is_empty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut acc = StrokeAccumulator::default();
        acc.begin_gesture();
        acc.append_segment(points(2), red());
        acc.stage(points(1));
        acc.reset();
        assert!(acc.drawing().is_empty());
        assert_eq!(acc.staged_len(), 0);
    }

    #[test]
    fn test_segment_carries_brush_settings() {
        let mut acc = StrokeAccumulator::default();
        acc.append_segment(points(2), red());
        let segment = &acc.drawing().strokes[0].segments[0];
        assert_eq!(segment.width, 5.0);
        assert_eq!(segment.opacity, 1.0);
        assert_eq!(segment.color, red());
    }
}
