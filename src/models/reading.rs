use serde::{Deserialize, Serialize};

use super::Point;

/// Kinematic features derived from one pair of consecutive samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionReading {
    /// Distance per second.
    pub velocity: f64,
    /// Change in velocity per second.
    pub jerk: f64,
    pub pressure: f64,
}

/// RGB color with channels in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeColor {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl StrokeColor {
    pub const fn new(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }

    pub fn to_rgb8(&self) -> [u8; 3] {
        [
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
        ]
    }
}

fn channel_to_u8(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// An interpolated point tagged with the pressure color of its segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColoredPoint {
    pub position: Point,
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl ColoredPoint {
    pub fn new(position: Point, color: StrokeColor) -> Self {
        Self {
            position,
            red: color.red,
            green: color.green,
            blue: color.blue,
        }
    }

    pub fn color(&self) -> StrokeColor {
        StrokeColor::new(self.red, self.green, self.blue)
    }
}
