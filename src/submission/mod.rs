pub mod client;
pub mod payload;
pub mod retry;

pub use client::HttpScoringClient;
pub use payload::{ScoreResponse, SubmissionPayload};
pub use retry::RetryPolicy;

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::raster::RasterError;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SubmissionError {
    #[error("could not rasterize drawing: {0}")]
    Rasterization(#[from] RasterError),

    #[error("could not encode submission: {0}")]
    Encode(String),

    #[error("scoring request failed: {0}")]
    Transport(String),

    #[error("scoring endpoint answered {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("malformed scoring response: {0}")]
    MalformedResponse(String),

    #[error("submission cancelled")]
    Cancelled,

    #[error("submission task failed: {0}")]
    Task(String),
}

impl SubmissionError {
    /// The endpoint was reached but did not answer with a usable score.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            SubmissionError::UnexpectedStatus { .. } | SubmissionError::MalformedResponse(_)
        )
    }
}

/// Remote scorer for a rasterized drawing.
pub trait ScoringService: Send + Sync + 'static {
    fn score(
        &self,
        payload: SubmissionPayload,
    ) -> impl Future<Output = Result<f64, SubmissionError>> + Send;
}

/// Record of one scored submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub id: String,
    pub prompt_index: usize,
    pub score: f64,
    /// Size of the submitted PNG.
    #[serde(default)]
    pub image_bytes: usize,
    pub submitted_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}
