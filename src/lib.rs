pub mod capture;
pub mod cli;
pub mod models;
pub mod prompts;
pub mod raster;
pub mod screening;
pub mod session;
pub mod settings;
pub mod submission;
pub mod utils;

use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::{info, warn};

use cli::{Cli, Commands};
use models::PointerEvent;
use raster::RasterSize;
use session::SessionController;
use settings::{debug_mode, AppSettings, SettingsStore};
use submission::HttpScoringClient;

pub use capture::StrokeGrouping;
pub use models::{Drawing, MotionReading};
pub use session::{CaptureSession, SessionError, SessionEvent};
pub use submission::{ScoringService, SubmissionError, SubmissionReceipt};
pub use utils::{init_logging, init_logging_with};

pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let level = if cli.verbose || debug_mode() {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    init_logging_with(level);

    let settings = match &cli.settings {
        Some(path) => SettingsStore::new(path.clone())?.settings(),
        None => AppSettings::default().with_env_overrides(),
    };

    match cli.command {
        Commands::Replay {
            events,
            out,
            color_map,
            log,
            submit,
        } => {
            let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
            runtime.block_on(replay(
                &settings,
                &events,
                &out,
                color_map.as_deref(),
                log.as_deref(),
                submit,
            ))
        }
        Commands::Settings => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}

pub fn load_events(path: &Path) -> Result<Vec<PointerEvent>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read events from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse pointer events in {}", path.display()))
}

async fn replay(
    settings: &AppSettings,
    events_path: &Path,
    out: &Path,
    color_map: Option<&Path>,
    log_path: Option<&Path>,
    submit: bool,
) -> Result<()> {
    let events = load_events(events_path)?;
    let controller = SessionController::<HttpScoringClient>::from_settings(settings)?;

    let mut readings = 0usize;
    for event in events.iter().copied() {
        if controller.handle_pointer(event).await.is_some() {
            readings += 1;
        }
    }
    let drawing = controller.current_drawing().await;
    info!(
        "replayed {} events: {} readings, {} strokes, {} segments",
        events.len(),
        readings,
        drawing.stroke_count(),
        drawing.segment_count()
    );

    let image = controller.rasterize().await?;
    fs::write(out, raster::encode_png(&image)?)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    info!("wrote submission image to {}", out.display());

    if let Some(path) = color_map {
        let size = RasterSize::new(settings.raster.width, settings.raster.height);
        let map = controller.color_map(size).await?;
        fs::write(path, raster::encode_png_rgba(&map)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("wrote color map to {}", path.display());
    }

    if let Some(path) = log_path {
        let json = controller.export_log().await?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    if submit {
        let handle = controller.submit().await?;
        match handle.wait().await {
            Ok(receipt) => println!("{}", serde_json::to_string_pretty(&receipt)?),
            Err(err) => {
                warn!("submission failed: {err}");
                return Err(err.into());
            }
        }
    }

    Ok(())
}
