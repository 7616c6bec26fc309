//! The job runner
//!
//! One call runs one job start to finish: validate, plan, drop a stale
//! output file, estimate, encode. There is no cancellation and no retry;
//! the single `Result` is matched once at the call site.

use crate::{
    Result,
    encoder::{EncodeConfig, encode_slideshow, resolve_audio},
    estimate::estimate_encode_time,
    job::JobRequest,
    progress::JobEvent,
};
use std::{fs, path::PathBuf};

/// Run one slideshow job, reporting progress through `on_event`.
///
/// Returns the output path on success. Validation failures abort before
/// any output is written; an existing file at the output path is removed
/// before encoding starts so an interrupted run can never leave a
/// half-overwritten older file behind.
pub fn run_job(
    request: &JobRequest,
    config: &EncodeConfig,
    mut on_event: impl FnMut(JobEvent),
) -> Result<PathBuf> {
    let plan = request.validate()?;
    let total = plan.total_duration();

    log::info!(
        "rendering {} image(s) into `{}`, {total:.1}s of video, audio: {:?}",
        plan.images.len(),
        plan.output.display(),
        plan.audio
    );

    on_event(JobEvent::Assembling {
        images: plan.images.len(),
        total_secs: total,
    });

    if plan.output.exists() {
        fs::remove_file(&plan.output)?;
    }

    // one probe per job; the sample and full encodes share the result
    let audio = resolve_audio(&plan);

    on_event(JobEvent::Estimating);
    let estimate = estimate_encode_time(&plan, config, audio.as_ref())?;
    log::info!(
        "sample encode: {:.1}s of video in {:.2}s, full encode estimated at {}",
        estimate.sample_secs,
        estimate.elapsed_secs,
        estimate.display()
    );
    on_event(JobEvent::Estimated(estimate));

    encode_slideshow(&plan, config, audio.as_ref(), &plan.output, total, |progress| {
        on_event(JobEvent::Encoding(progress));
    })?;

    Ok(plan.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_invalid_request_emits_no_events_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mp4");

        let request = JobRequest::default()
            .with_image_folder(dir.path().display().to_string())
            .with_output(output.display().to_string());

        let mut events = 0;
        let err = run_job(&request, &EncodeConfig::default(), |_| events += 1).unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(events, 0);
        assert!(!output.exists());
    }

    #[test]
    fn test_bad_seconds_fails_before_touching_output() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"x").unwrap();
        let output = dir.path().join("stale.mp4");
        std::fs::write(&output, b"previous run").unwrap();

        let request = JobRequest::default()
            .with_image_folder(dir.path().display().to_string())
            .with_output(output.display().to_string())
            .with_seconds_per_image("zero".to_string());

        let err = run_job(&request, &EncodeConfig::default(), |_| ()).unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        // the stale output survives a validation failure untouched
        assert_eq!(std::fs::read(&output).unwrap(), b"previous run");
    }
}
