pub mod controller;
pub mod state;

pub use controller::{SessionController, SessionError, SessionEvent, SubmissionHandle};
pub use state::{CaptureSession, CaptureSnapshot};
