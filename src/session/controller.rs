use std::sync::Arc;

use chrono::Utc;
use image::{RgbImage, RgbaImage};
use log::{error, info};
use serde::Serialize;
use thiserror::Error;
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    models::{Drawing, MotionReading, PointerEvent},
    prompts::PromptSequence,
    raster::{rasterize_color_map, rasterize_with, RasterError, RasterOptions, RasterSize},
    screening::{ScoreBoard, ScreeningSummary},
    settings::AppSettings,
    submission::{
        HttpScoringClient, ScoringService, SubmissionError, SubmissionPayload, SubmissionReceipt,
    },
};

use super::{CaptureSession, CaptureSnapshot};

const EVENT_CAPACITY: usize = 256;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("prompt {0} has already been scored")]
    PromptAlreadyScored(usize),

    #[error("prompt {0} has not been scored yet")]
    PromptNotScored(usize),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SessionEvent {
    ReadingLogged { reading: MotionReading },
    DrawingChanged { stroke_count: usize },
    SessionReset,
    PromptChanged { index: usize, prompt: String },
    SubmissionStarted { id: String, prompt_index: usize },
    SubmissionSucceeded { receipt: SubmissionReceipt },
    SubmissionFailed { id: String, message: String },
    ScreeningComplete { summary: ScreeningSummary },
}

/// Prompt position and the scores collected so far.
struct Progress {
    prompts: PromptSequence,
    board: ScoreBoard,
    current_scored: bool,
}

/// Handle to a running submission task.
pub struct SubmissionHandle {
    pub id: String,
    cancel_token: CancellationToken,
    handle: JoinHandle<Result<SubmissionReceipt, SubmissionError>>,
}

impl SubmissionHandle {
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub async fn wait(self) -> Result<SubmissionReceipt, SubmissionError> {
        match self.handle.await {
            Ok(result) => result,
            Err(join_err) if join_err.is_cancelled() => Err(SubmissionError::Cancelled),
            Err(join_err) => Err(SubmissionError::Task(join_err.to_string())),
        }
    }
}

/// Serializes pointer handling, undo, reset and submission for one
/// screening run.
pub struct SessionController<S: ScoringService> {
    session: Arc<Mutex<CaptureSession>>,
    progress: Arc<Mutex<Progress>>,
    in_flight: Arc<Mutex<Option<CancellationToken>>>,
    scorer: Arc<S>,
    events: broadcast::Sender<SessionEvent>,
    raster: RasterOptions,
}

impl<S: ScoringService> Clone for SessionController<S> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            progress: Arc::clone(&self.progress),
            in_flight: Arc::clone(&self.in_flight),
            scorer: Arc::clone(&self.scorer),
            events: self.events.clone(),
            raster: self.raster,
        }
    }
}

impl SessionController<HttpScoringClient> {
    pub fn from_settings(settings: &AppSettings) -> Result<Self, SubmissionError> {
        let client = HttpScoringClient::new(&settings.scoring)?;
        Ok(Self::new(settings, client))
    }
}

impl<S: ScoringService> SessionController<S> {
    pub fn new(settings: &AppSettings, scorer: S) -> Self {
        Self::with_prompts(settings, scorer, PromptSequence::default())
    }

    pub fn with_prompts(settings: &AppSettings, scorer: S, prompts: PromptSequence) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            session: Arc::new(Mutex::new(CaptureSession::new(&settings.capture))),
            progress: Arc::new(Mutex::new(Progress {
                prompts,
                board: ScoreBoard::new(settings.screening.clone()),
                current_scored: false,
            })),
            in_flight: Arc::new(Mutex::new(None)),
            scorer: Arc::new(scorer),
            events,
            raster: settings.raster.options(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn handle_pointer(&self, event: PointerEvent) -> Option<MotionReading> {
        let reading = self.session.lock().await.handle_pointer(event);
        if let Some(reading) = reading {
            self.emit(SessionEvent::ReadingLogged { reading });
        }
        reading
    }

    pub async fn undo(&self) -> bool {
        let (removed, stroke_count) = {
            let mut session = self.session.lock().await;
            let removed = session.undo();
            (removed, session.drawing().stroke_count())
        };
        if removed {
            self.emit(SessionEvent::DrawingChanged { stroke_count });
        }
        removed
    }

    /// Clear the capture session. Refused while a submission is in flight.
    pub async fn reset(&self) -> Result<(), SessionError> {
        let in_flight = self.in_flight.lock().await;
        if in_flight.is_some() {
            return Err(SessionError::SubmissionInFlight);
        }
        self.session.lock().await.reset();
        drop(in_flight);

        self.emit(SessionEvent::SessionReset);
        Ok(())
    }

    /// Move to the next prompt after the current one was scored, clearing
    /// the capture session. Returns false when the last prompt is done.
    pub async fn advance_prompt(&self) -> Result<bool, SessionError> {
        let in_flight = self.in_flight.lock().await;
        if in_flight.is_some() {
            return Err(SessionError::SubmissionInFlight);
        }

        let mut progress = self.progress.lock().await;
        if !progress.current_scored {
            return Err(SessionError::PromptNotScored(progress.prompts.index()));
        }
        if !progress.prompts.advance() {
            return Ok(false);
        }
        progress.current_scored = false;
        self.session.lock().await.reset();

        let index = progress.prompts.index();
        let prompt = progress.prompts.current().unwrap_or_default().to_string();
        drop(progress);
        drop(in_flight);

        info!("advanced to prompt {index}");
        self.emit(SessionEvent::SessionReset);
        self.emit(SessionEvent::PromptChanged { index, prompt });
        Ok(true)
    }

    pub async fn current_drawing(&self) -> Drawing {
        self.session.lock().await.current_drawing()
    }

    pub async fn capture_log(&self) -> Vec<MotionReading> {
        self.session.lock().await.readings()
    }

    pub async fn export_log(&self) -> anyhow::Result<String> {
        self.session.lock().await.capture_log().export_json()
    }

    pub async fn snapshot(&self) -> CaptureSnapshot {
        self.session.lock().await.snapshot()
    }

    /// Submission raster of the current drawing, without submitting it.
    pub async fn rasterize(&self) -> Result<RgbImage, RasterError> {
        let drawing = self.current_drawing().await;
        rasterize_with(&drawing, &self.raster)
    }

    pub async fn color_map(&self, size: RasterSize) -> Result<RgbaImage, RasterError> {
        let session = self.session.lock().await;
        rasterize_color_map(session.colored_points(), size)
    }

    pub async fn current_prompt(&self) -> (usize, Option<String>) {
        let progress = self.progress.lock().await;
        (
            progress.prompts.index(),
            progress.prompts.current().map(str::to_string),
        )
    }

    pub async fn scores(&self) -> Vec<f64> {
        self.progress.lock().await.board.scores()
    }

    pub async fn receipts(&self) -> Vec<SubmissionReceipt> {
        self.progress.lock().await.board.receipts().to_vec()
    }

    pub async fn summary(&self) -> Option<ScreeningSummary> {
        self.progress.lock().await.board.summary()
    }

    pub async fn is_submitting(&self) -> bool {
        self.in_flight.lock().await.is_some()
    }

    pub async fn cancel_submission(&self) {
        if let Some(token) = self.in_flight.lock().await.as_ref() {
            token.cancel();
        }
    }

    /// Snapshot the drawing and score it in the background.
    ///
    /// Pointer input keeps flowing while the task runs. On success the score
    /// is recorded against the current prompt; the drawing and log are left
    /// alone either way.
    pub async fn submit(&self) -> Result<SubmissionHandle, SessionError> {
        let mut in_flight = self.in_flight.lock().await;
        if in_flight.is_some() {
            return Err(SessionError::SubmissionInFlight);
        }

        let prompt_index = {
            let progress = self.progress.lock().await;
            if progress.current_scored {
                return Err(SessionError::PromptAlreadyScored(progress.prompts.index()));
            }
            progress.prompts.index()
        };

        let drawing = self.session.lock().await.current_drawing();
        let cancel_token = CancellationToken::new();
        *in_flight = Some(cancel_token.clone());
        drop(in_flight);

        let id = Uuid::new_v4().to_string();
        info!(
            "submitting prompt {} ({} strokes) as {}",
            prompt_index,
            drawing.stroke_count(),
            id
        );
        self.emit(SessionEvent::SubmissionStarted {
            id: id.clone(),
            prompt_index,
        });

        let controller = self.clone();
        let task_id = id.clone();
        let token = cancel_token.clone();
        let handle = tokio::spawn(async move {
            controller
                .run_submission(task_id, prompt_index, drawing, token)
                .await
        });

        Ok(SubmissionHandle {
            id,
            cancel_token,
            handle,
        })
    }

    async fn run_submission(
        &self,
        id: String,
        prompt_index: usize,
        drawing: Drawing,
        cancel_token: CancellationToken,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let submitted_at = Utc::now();

        // Scoring runs in its own task so a panic in the scorer or the
        // rasterizer still reaches the bookkeeping below.
        let scorer = Arc::clone(&self.scorer);
        let raster = self.raster;
        let mut scoring =
            tokio::spawn(async move { score_drawing(scorer.as_ref(), drawing, raster).await });

        let result = tokio::select! {
            _ = cancel_token.cancelled() => {
                scoring.abort();
                Err(SubmissionError::Cancelled)
            }
            joined = &mut scoring => match joined {
                Ok(scored) => scored,
                Err(join_err) => Err(SubmissionError::Task(join_err.to_string())),
            },
        };

        let outcome = match result {
            Ok((score, image_bytes)) => {
                let receipt = SubmissionReceipt {
                    id: id.clone(),
                    prompt_index,
                    score,
                    image_bytes,
                    submitted_at,
                    completed_at: Utc::now(),
                };
                let summary = {
                    let mut progress = self.progress.lock().await;
                    progress.board.record(receipt.clone());
                    progress.current_scored = true;
                    progress.board.summary()
                };

                info!("submission {} scored {}", id, score);
                self.emit(SessionEvent::SubmissionSucceeded {
                    receipt: receipt.clone(),
                });
                if let Some(summary) = summary {
                    info!(
                        "screening complete: average {:.3} over {} submissions",
                        summary.average, summary.submissions
                    );
                    self.emit(SessionEvent::ScreeningComplete { summary });
                }
                Ok(receipt)
            }
            Err(err) => {
                error!("submission {} failed: {}", id, err);
                self.emit(SessionEvent::SubmissionFailed {
                    id: id.clone(),
                    message: err.to_string(),
                });
                Err(err)
            }
        };

        *self.in_flight.lock().await = None;
        outcome
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }
}

/// Score plus the size of the PNG that was sent.
async fn score_drawing<S: ScoringService>(
    scorer: &S,
    drawing: Drawing,
    raster: RasterOptions,
) -> Result<(f64, usize), SubmissionError> {
    let payload = tokio::task::spawn_blocking(move || SubmissionPayload::from_drawing(&drawing, &raster))
        .await
        .map_err(|e| SubmissionError::Task(e.to_string()))??;

    let image_bytes = payload.png_len();
    let score = scorer.score(payload).await?;
    Ok((score, image_bytes))
}
