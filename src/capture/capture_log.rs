use std::collections::VecDeque;

use anyhow::Result;

use crate::models::MotionReading;

/// Chronological record of the readings emitted in the current session.
#[derive(Debug, Default)]
pub struct CaptureLog {
    readings: VecDeque<MotionReading>,
    capacity: Option<usize>,
    total_recorded: u64,
}

impl CaptureLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` readings, dropping the oldest first.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            readings: VecDeque::with_capacity(capacity.min(4096)),
            capacity: Some(capacity.max(1)),
            total_recorded: 0,
        }
    }

    pub fn append(&mut self, reading: MotionReading) {
        if let Some(capacity) = self.capacity {
            while self.readings.len() >= capacity {
                self.readings.pop_front();
            }
        }
        self.readings.push_back(reading);
        self.total_recorded += 1;
    }

    pub fn clear(&mut self) {
        self.readings.clear();
        self.total_recorded = 0;
    }

    pub fn as_sequence(&self) -> Vec<MotionReading> {
        self.readings.iter().copied().collect()
    }

    pub fn last(&self) -> Option<&MotionReading> {
        self.readings.back()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Readings appended since the last clear, including any dropped by the
    /// capacity bound.
    pub fn total_recorded(&self) -> u64 {
        self.total_recorded
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.readings)?)
    }
}
