pub mod accumulator;
pub mod capture_log;
pub mod filter;
pub mod interpolation;
pub mod kinematics;

pub use accumulator::{StrokeAccumulator, StrokeGrouping};
pub use capture_log::CaptureLog;
pub use filter::{Filtered, SampleFilter};
pub use interpolation::{interpolate, DEFAULT_STEP, MAX_STEPS};
pub use kinematics::{estimate, pressure_color, KinematicEstimator};
