//! The validated timeline of one run
//!
//! A [`SlideshowPlan`] is the resolved form of a job request: the sorted
//! image list, the per-image display duration and the optional audio track.
//! Total video duration is fixed here, before any encoding starts.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct SlideshowPlan {
    /// Image files in ascending filename order
    pub images: Vec<PathBuf>,
    /// Display duration per image, seconds (positive)
    pub seconds_per_image: f64,
    /// Background audio, looped and trimmed to the video duration
    pub audio: Option<PathBuf>,
    /// Output video file
    pub output: PathBuf,
}

impl SlideshowPlan {
    /// Total video duration in seconds: image count times per-image duration.
    pub fn total_duration(&self) -> f64 {
        self.images.len() as f64 * self.seconds_per_image
    }

    /// How many times the source audio must play to cover the video.
    ///
    /// Audio policy is repeat-then-trim: the source is conceptually
    /// concatenated with itself `ceil(D / a)` times, then cut to exactly
    /// the video duration.
    pub fn loop_repetitions(&self, audio_secs: f64) -> u32 {
        if audio_secs <= 0.0 {
            return 1;
        }

        (self.total_duration() / audio_secs).ceil().max(1.0) as u32
    }

    /// Concat-demuxer script listing every image with its display duration.
    pub fn concat_script(&self) -> String {
        let mut script = String::from("ffconcat version 1.0\n");

        for image in &self.images {
            script.push_str(&format!(
                "file '{}'\nduration {}\n",
                escape_concat_path(image),
                self.seconds_per_image
            ));
        }

        // the demuxer drops the final duration unless the last entry repeats
        if let Some(last) = self.images.last() {
            script.push_str(&format!("file '{}'\n", escape_concat_path(last)));
        }

        script
    }
}

fn escape_concat_path(path: &Path) -> String {
    path.to_string_lossy().replace('\'', r"'\''")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_with(images: usize, seconds: f64) -> SlideshowPlan {
        SlideshowPlan {
            images: (0..images).map(|i| PathBuf::from(format!("{i}.png"))).collect(),
            seconds_per_image: seconds,
            audio: None,
            output: PathBuf::from("out.mp4"),
        }
    }

    #[test]
    fn test_total_duration() {
        assert_eq!(plan_with(3, 2.0).total_duration(), 6.0);
        assert_eq!(plan_with(7, 1.5).total_duration(), 10.5);
        assert_eq!(plan_with(0, 2.0).total_duration(), 0.0);
    }

    #[test]
    fn test_loop_repetitions() {
        let plan = plan_with(3, 2.0); // 6 seconds of video

        assert_eq!(plan.loop_repetitions(4.0), 2); // 4s song plays twice
        assert_eq!(plan.loop_repetitions(6.0), 1); // exact fit
        assert_eq!(plan.loop_repetitions(3.0), 2); // exact multiple
        assert_eq!(plan.loop_repetitions(10.0), 1); // longer than the video
        assert_eq!(plan.loop_repetitions(0.0), 1); // degenerate source
    }

    #[test]
    fn test_concat_script_lists_every_image_with_duration() {
        let script = plan_with(2, 2.0).concat_script();

        assert!(script.starts_with("ffconcat version 1.0\n"));
        assert_eq!(script.matches("duration 2\n").count(), 2);
        // last file repeated so the demuxer honors the final duration
        assert_eq!(script.matches("file '1.png'\n").count(), 2);
    }

    #[test]
    fn test_concat_script_escapes_quotes() {
        let mut plan = plan_with(1, 2.0);
        plan.images = vec![PathBuf::from("it's.png")];

        let script = plan.concat_script();
        assert!(script.contains(r"file 'it'\''s.png'"));
    }
}
