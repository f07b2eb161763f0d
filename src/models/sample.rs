use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Stylus orientation in radians, when the hardware reports it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Orientation {
    pub azimuth: f64,
    pub altitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointerPhase {
    Down,
    Moved,
    Up,
    Cancelled,
}

/// Raw pointer event as delivered by the host input source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Point,
    /// Device-normalized force, expected in [0, 1].
    #[serde(default)]
    pub force: f64,
    #[serde(default)]
    pub orientation: Option<Orientation>,
    /// Monotonic timestamp in seconds. A stroke whose first sample has none
    /// is timed by the filter's own clock.
    #[serde(default)]
    pub timestamp: Option<f64>,
}

impl PointerEvent {
    pub fn down(x: f64, y: f64, force: f64, timestamp: f64) -> Self {
        Self::with_phase(PointerPhase::Down, x, y, force, timestamp)
    }

    pub fn moved(x: f64, y: f64, force: f64, timestamp: f64) -> Self {
        Self::with_phase(PointerPhase::Moved, x, y, force, timestamp)
    }

    pub fn up(x: f64, y: f64, timestamp: f64) -> Self {
        Self::with_phase(PointerPhase::Up, x, y, 0.0, timestamp)
    }

    fn with_phase(phase: PointerPhase, x: f64, y: f64, force: f64, timestamp: f64) -> Self {
        Self {
            phase,
            position: Point::new(x, y),
            force,
            orientation: None,
            timestamp: Some(timestamp),
        }
    }

    pub fn with_orientation(mut self, azimuth: f64, altitude: f64) -> Self {
        self.orientation = Some(Orientation { azimuth, altitude });
        self
    }
}

/// A validated pointer sample. Immutable once produced by the filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub position: Point,
    pub pressure: f64,
    pub timestamp: f64,
    pub orientation: Option<Orientation>,
}

impl Sample {
    pub fn new(x: f64, y: f64, pressure: f64, timestamp: f64) -> Self {
        Self {
            position: Point::new(x, y),
            pressure,
            timestamp,
            orientation: None,
        }
    }
}
