use std::time::Duration;

use reqwest::{header::CONTENT_TYPE, Client, StatusCode};

use crate::settings::ScoringSettings;

use super::retry::{send_with_retry, RetryPolicy};
use super::{ScoreResponse, ScoringService, SubmissionError, SubmissionPayload};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Posts submission payloads to the remote scoring endpoint.
#[derive(Clone)]
pub struct HttpScoringClient {
    client: Client,
    endpoint: String,
    retry: RetryPolicy,
}

impl HttpScoringClient {
    pub fn new(settings: &ScoringSettings) -> Result<Self, SubmissionError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            retry: RetryPolicy {
                max_attempts: settings.max_attempts,
                base_delay: Duration::from_millis(settings.backoff_ms),
            },
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ScoringService for HttpScoringClient {
    async fn score(&self, payload: SubmissionPayload) -> Result<f64, SubmissionError> {
        log_info!(
            "submitting drawing to {} ({} base64 chars)",
            self.endpoint,
            payload.image_data.len()
        );

        let body = payload.to_json()?;
        let response = send_with_retry(
            &self.client,
            |c| {
                c.post(&self.endpoint)
                    .header(CONTENT_TYPE, "application/json")
                    .body(body.clone())
            },
            &self.retry,
            "score submission",
        )
        .await
        .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        if status != StatusCode::OK {
            log_warn!("scoring endpoint answered {}: {}", status, body);
            return Err(SubmissionError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = ScoreResponse::parse(&body)?;
        log_info!("scoring endpoint returned score {}", parsed.score);
        Ok(parsed.score)
    }
}
