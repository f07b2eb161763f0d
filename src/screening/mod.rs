pub mod aggregate;

pub use aggregate::{ScoreBoard, ScreeningOutcome, ScreeningSummary};
