use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Point, StrokeColor};

pub const DEFAULT_BRUSH_WIDTH: f64 = 5.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum InkTool {
    #[default]
    Pen,
}

/// One point of a segment's path, as handed to the ink renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlPoint {
    pub location: Point,
    /// Seconds between the two raw samples this point was interpolated from.
    pub time_offset: f64,
    pub size: f64,
    pub opacity: f64,
    pub force: f64,
    pub azimuth: Option<f64>,
    pub altitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub points: Vec<ControlPoint>,
    pub color: StrokeColor,
    pub width: f64,
    pub opacity: f64,
    pub tool: InkTool,
    pub created_at: DateTime<Utc>,
}

impl Segment {
    pub fn new(points: Vec<ControlPoint>, color: StrokeColor, width: f64) -> Self {
        Self {
            points,
            color,
            width,
            opacity: 1.0,
            tool: InkTool::Pen,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub id: String,
    pub segments: Vec<Segment>,
}

impl Stroke {
    pub fn new(first: Segment) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            segments: vec![first],
        }
    }

    pub fn point_count(&self) -> usize {
        self.segments.iter().map(|s| s.points.len()).sum()
    }
}

/// Axis-aligned bounding box in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    fn include(&mut self, p: Point, pad: f64) {
        self.min_x = self.min_x.min(p.x - pad);
        self.min_y = self.min_y.min(p.y - pad);
        self.max_x = self.max_x.max(p.x + pad);
        self.max_y = self.max_y.max(p.y + pad);
    }
}

/// Ordered strokes of one capture session. The last stroke is the most recent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawing {
    pub strokes: Vec<Stroke>,
}

impl Drawing {
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn segment_count(&self) -> usize {
        self.strokes.iter().map(|s| s.segments.len()).sum()
    }

    /// Ink bounds: the control-point box grown by half of each segment's width.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        for segment in self.strokes.iter().flat_map(|s| s.segments.iter()) {
            let pad = segment.width / 2.0;
            for cp in &segment.points {
                let p = cp.location;
                match bounds.as_mut() {
                    Some(b) => b.include(p, pad),
                    None => {
                        bounds = Some(Bounds {
                            min_x: p.x - pad,
                            min_y: p.y - pad,
                            max_x: p.x + pad,
                            max_y: p.y + pad,
                        })
                    }
                }
            }
        }
        bounds
    }
}
