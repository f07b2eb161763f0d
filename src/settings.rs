use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::capture::{StrokeGrouping, DEFAULT_STEP};
use crate::models::drawing::DEFAULT_BRUSH_WIDTH;
use crate::raster::{RasterOptions, RasterSize, SUBMISSION_SIZE};

pub const SCORING_URL_ENV: &str = "DRAWSCREEN_SCORING_URL";
pub const DEBUG_ENV: &str = "DRAWSCREEN_DEBUG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringSettings {
    pub endpoint: String,
    pub timeout_ms: u64,
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8000/process-image/".into(),
            timeout_ms: 30_000,
            max_attempts: 3,
            backoff_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaptureSettings {
    pub interpolation_step: f64,
    pub brush_width: f64,
    pub stroke_grouping: StrokeGrouping,
    /// Upper bound on retained log entries; `None` keeps every reading.
    pub log_capacity: Option<usize>,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            interpolation_step: DEFAULT_STEP,
            brush_width: DEFAULT_BRUSH_WIDTH,
            stroke_grouping: StrokeGrouping::PerGesture,
            log_capacity: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RasterSettings {
    pub width: u32,
    pub height: u32,
    pub background: [u8; 3],
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            width: SUBMISSION_SIZE.width,
            height: SUBMISSION_SIZE.height,
            background: [0, 0, 0],
        }
    }
}

impl RasterSettings {
    pub fn options(&self) -> RasterOptions {
        RasterOptions {
            size: RasterSize::new(self.width, self.height),
            background: self.background,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScreeningSettings {
    pub required_submissions: usize,
    pub threshold: f64,
}

impl Default for ScreeningSettings {
    fn default() -> Self {
        Self {
            required_submissions: 4,
            threshold: 0.4,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    pub scoring: ScoringSettings,
    pub capture: CaptureSettings,
    pub raster: RasterSettings,
    pub screening: ScreeningSettings,
}

impl AppSettings {
    /// Apply environment overrides on top of file/default values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(SCORING_URL_ENV) {
            if !url.trim().is_empty() {
                self.scoring.endpoint = url.trim().to_string();
            }
        }
        self
    }
}

pub fn debug_mode() -> bool {
    std::env::var(DEBUG_ENV)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<AppSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!(
                    "Ignoring unreadable settings file {}: {err}",
                    path.display()
                );
                AppSettings::default()
            })
        } else {
            AppSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Current settings with environment overrides applied.
    pub fn settings(&self) -> AppSettings {
        self.read().clone().with_env_overrides()
    }

    pub fn update(&self, settings: AppSettings) -> Result<()> {
        let mut guard = self.write();
        *guard = settings;
        self.persist(&guard)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: AppSettings = serde_json::from_str(&contents)?;
        *self.write() = data;
        Ok(())
    }

    fn persist(&self, data: &AppSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, AppSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, AppSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
