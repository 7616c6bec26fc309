//! Progress events and UI-side rate limiting
//!
//! The worker reports progress through typed events rather than by mutating
//! UI state directly; the consumer marshals them onto its own thread and
//! may throttle the high-frequency ones.

use crate::estimate::Estimate;
use std::time::{Duration, Instant};

/// Progress of one running job, emitted in order.
#[derive(Debug, Clone)]
pub enum JobEvent {
    /// Inputs validated; the timeline is being assembled
    Assembling { images: usize, total_secs: f64 },
    /// The sample encode is running
    Estimating,
    /// Sample encode finished; full-encode estimate available
    Estimated(Estimate),
    /// Full-encode progress as a fraction in `0..=1`
    Encoding(f32),
}

/// Passes at most one update per fixed interval.
///
/// Redundant redraws during a long encode would saturate the UI thread;
/// consumers gate [`JobEvent::Encoding`] ticks through this and let state
/// changes through unconditionally.
#[derive(Debug)]
pub struct ProgressThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl ProgressThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// True when enough time has passed since the last accepted update.
    pub fn ready(&mut self) -> bool {
        match self.last {
            Some(at) if at.elapsed() < self.interval => false,
            _ => {
                self.last = Some(Instant::now());
                true
            }
        }
    }
}
