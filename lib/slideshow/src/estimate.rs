//! Encode-time estimation
//!
//! Before committing to the full encode, a short sample of the assembled
//! timeline is encoded to a throwaway file and timed. Extrapolating from
//! the measured throughput gives the user a minutes:seconds figure instead
//! of an indeterminate wait.

use crate::{
    Result,
    encoder::{AudioSource, EncodeConfig, encode_slideshow},
    plan::SlideshowPlan,
};
use std::time::Instant;

/// Upper bound on the sample encode length, seconds.
pub(crate) const SAMPLE_SECONDS: f64 = 10.0;

/// Guard against division by zero on a vanishingly fast sample encode.
const EPSILON: f64 = 1e-6;

/// Result of one sample encode measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Seconds of source video encoded in the sample
    pub sample_secs: f64,
    /// Wall-clock time the sample encode took
    pub elapsed_secs: f64,
    /// Seconds of source video encoded per second of wall time
    pub throughput: f64,
    /// Extrapolated wall-clock time for the full encode
    pub estimated_secs: f64,
}

impl Estimate {
    /// Extrapolate a full-encode estimate from a timed sample.
    ///
    /// Finite and non-negative for any non-negative inputs, including a
    /// zero elapsed time.
    pub fn compute(total_secs: f64, sample_secs: f64, elapsed_secs: f64) -> Self {
        let throughput = sample_secs / elapsed_secs.max(EPSILON);
        let estimated_secs = total_secs / throughput.max(EPSILON);

        Self {
            sample_secs,
            elapsed_secs,
            throughput,
            estimated_secs,
        }
    }

    /// Render as `minutes:seconds`, truncating fractional seconds.
    pub fn display(&self) -> String {
        let secs = self.estimated_secs as u64;
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}

/// Sample length for a video of `total_secs`: at most [`SAMPLE_SECONDS`],
/// never longer than the video itself.
pub(crate) fn sample_duration(total_secs: f64) -> f64 {
    total_secs.min(SAMPLE_SECONDS)
}

/// Encode the first `min(10, D)` seconds of the plan to a temp file, timing
/// the wall clock, and extrapolate the full encode duration.
///
/// Uses the same encoder settings and resolved audio the full encode will
/// use, so the measured throughput carries over. Removal of the temp
/// output is best effort; a failure is logged and never surfaced.
pub fn estimate_encode_time(
    plan: &SlideshowPlan,
    config: &EncodeConfig,
    audio: Option<&AudioSource>,
) -> Result<Estimate> {
    let total = plan.total_duration();
    let sample = sample_duration(total);

    let dir = tempfile::tempdir()?;
    let sample_output = dir.path().join("sample.mp4");

    let start = Instant::now();
    encode_slideshow(plan, config, audio, &sample_output, sample, |_| ())?;
    let elapsed = start.elapsed().as_secs_f64();

    if let Err(e) = dir.close() {
        log::warn!("failed to remove sample encode output. {e}");
    }

    Ok(Estimate::compute(total, sample, elapsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_duration_caps_at_ten_seconds() {
        assert_eq!(sample_duration(25.0), 10.0);
        assert_eq!(sample_duration(10.0), 10.0);
        assert_eq!(sample_duration(6.0), 6.0);
        assert_eq!(sample_duration(0.5), 0.5);
    }

    #[test]
    fn test_compute_extrapolates_linearly() {
        // 10s sample took 10s -> throughput 1.0 -> 207s total stays 207s
        let estimate = Estimate::compute(207.0, 10.0, 10.0);
        assert_eq!(estimate.throughput, 1.0);
        assert_eq!(estimate.estimated_secs, 207.0);
        assert_eq!(estimate.display(), "3:27");

        // twice realtime -> half the wall time
        let estimate = Estimate::compute(120.0, 10.0, 5.0);
        assert_eq!(estimate.throughput, 2.0);
        assert_eq!(estimate.estimated_secs, 60.0);
        assert_eq!(estimate.display(), "1:00");
    }

    #[test]
    fn test_compute_survives_instant_sample() {
        let estimate = Estimate::compute(600.0, 10.0, 0.0);

        assert!(estimate.throughput.is_finite());
        assert!(estimate.estimated_secs.is_finite());
        assert!(estimate.estimated_secs >= 0.0);
    }

    #[test]
    fn test_display_truncates() {
        let mut estimate = Estimate::compute(0.0, 10.0, 1.0);
        estimate.estimated_secs = 59.9;
        assert_eq!(estimate.display(), "0:59");

        estimate.estimated_secs = 61.2;
        assert_eq!(estimate.display(), "1:01");

        estimate.estimated_secs = 0.0;
        assert_eq!(estimate.display(), "0:00");
    }
}
