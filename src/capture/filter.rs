use std::time::Instant;

use crate::models::{PointerEvent, PointerPhase, Sample};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

/// What the filter made of one raw pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filtered {
    /// Pointer went down; previous-sample state was cleared.
    StrokeStarted,
    /// First sample of a stroke. Recorded as the stroke origin but there is
    /// no earlier point to differentiate against.
    Origin(Sample),
    /// A sample with a predecessor in the same stroke.
    Motion { previous: Sample, current: Sample },
    /// Pointer lifted or the gesture was cancelled.
    StrokeEnded,
    Rejected(&'static str),
}

/// Where a stroke's timestamps come from. Fixed by the stroke's first
/// sample so `dt` is never taken across two clocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeSource {
    Host,
    Clock,
}

/// Turns raw pointer events into validated samples and remembers the
/// previous sample of the current stroke.
///
/// A stroke whose first sample carries no timestamp is timed by the
/// filter's own clock throughout. In a host-stamped stroke an unstamped
/// sample reuses the previous timestamp and so yields a zero reading.
pub struct SampleFilter {
    previous: Option<Sample>,
    time_source: Option<TimeSource>,
    clock: Instant,
}

impl Default for SampleFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleFilter {
    pub fn new() -> Self {
        Self {
            previous: None,
            time_source: None,
            clock: Instant::now(),
        }
    }

    pub fn observe(&mut self, event: PointerEvent) -> Filtered {
        match event.phase {
            PointerPhase::Down => {
                self.reset();
                Filtered::StrokeStarted
            }
            PointerPhase::Up | PointerPhase::Cancelled => {
                self.reset();
                Filtered::StrokeEnded
            }
            PointerPhase::Moved => match self.to_sample(&event) {
                Ok(current) => match self.previous.replace(current) {
                    Some(previous) => Filtered::Motion { previous, current },
                    None => Filtered::Origin(current),
                },
                Err(reason) => {
                    log_warn!("dropping pointer sample: {reason}");
                    Filtered::Rejected(reason)
                }
            },
        }
    }

    pub fn previous(&self) -> Option<&Sample> {
        self.previous.as_ref()
    }

    pub fn reset(&mut self) {
        self.previous = None;
        self.time_source = None;
    }

    fn timestamp_for(&mut self, event: &PointerEvent) -> f64 {
        let source = *self.time_source.get_or_insert(match event.timestamp {
            Some(_) => TimeSource::Host,
            None => TimeSource::Clock,
        });

        match (source, event.timestamp) {
            (TimeSource::Host, Some(t)) => t,
            (TimeSource::Host, None) => {
                log_debug!("unstamped sample in host-timed stroke");
                self.previous.map(|p| p.timestamp).unwrap_or(0.0)
            }
            (TimeSource::Clock, _) => self.clock.elapsed().as_secs_f64(),
        }
    }

    fn to_sample(&mut self, event: &PointerEvent) -> Result<Sample, &'static str> {
        if !event.position.is_finite() {
            return Err("non-finite position");
        }
        if event.timestamp.is_some_and(|t| !t.is_finite()) {
            return Err("non-finite timestamp");
        }

        let timestamp = self.timestamp_for(event);

        let pressure = if event.force.is_finite() {
            event.force.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Ok(Sample {
            position: event.position,
            pressure,
            timestamp,
            orientation: event.orientation,
        })
    }
}
