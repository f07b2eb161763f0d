pub mod drawing;
pub mod reading;
pub mod sample;

pub use drawing::{Bounds, ControlPoint, Drawing, InkTool, Segment, Stroke};
pub use reading::{ColoredPoint, MotionReading, StrokeColor};
pub use sample::{Orientation, Point, PointerEvent, PointerPhase, Sample};
