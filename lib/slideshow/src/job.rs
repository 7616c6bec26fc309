//! Job request snapshot and input validation
//!
//! A [`JobRequest`] carries the raw form fields of one run. It is taken as
//! an immutable snapshot when the run starts, so the worker never reads
//! live UI state.

use crate::{Error, Result, plan::SlideshowPlan};
use derivative::Derivative;
use derive_setters::Setters;
use std::path::{Path, PathBuf};

/// Image file extensions picked up from the folder (case-insensitive).
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// The raw inputs of one slideshow run, as entered in the form.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct JobRequest {
    /// Folder scanned (non-recursively) for still images
    #[derivative(Default(value = "String::new()"))]
    pub image_folder: String,
    /// Optional background audio file; empty means silent output
    #[derivative(Default(value = "String::new()"))]
    pub audio_file: String,
    /// Output video file path
    #[derivative(Default(value = "String::new()"))]
    pub output: String,
    /// Display duration per image, unparsed form text
    #[derivative(Default(value = "\"2\".to_string()"))]
    pub seconds_per_image: String,
}

impl JobRequest {
    /// Validate the request and resolve it into a [`SlideshowPlan`].
    ///
    /// Fails with [`Error::InvalidInput`] before any work is performed:
    /// empty folder or output path, a seconds value that is not a finite
    /// positive number, or a folder with no qualifying images. The seconds
    /// value is checked before the folder is read.
    pub fn validate(&self) -> Result<SlideshowPlan> {
        if self.image_folder.trim().is_empty() {
            return Err(Error::InvalidInput("no image folder selected".to_string()));
        }

        if self.output.trim().is_empty() {
            return Err(Error::InvalidInput("no output file selected".to_string()));
        }

        let seconds = self.seconds_per_image.trim().parse::<f64>().map_err(|_| {
            Error::InvalidInput(format!(
                "seconds per image `{}` is not a number",
                self.seconds_per_image
            ))
        })?;

        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "seconds per image must be positive, got `{}`",
                self.seconds_per_image
            )));
        }

        let images = collect_images(Path::new(&self.image_folder))?;
        if images.is_empty() {
            return Err(Error::InvalidInput(format!(
                "no images found in `{}`",
                self.image_folder
            )));
        }

        let audio = if self.audio_file.trim().is_empty() {
            None
        } else {
            let path = PathBuf::from(&self.audio_file);
            if path.exists() {
                Some(path)
            } else {
                log::warn!("audio file `{}` does not exist, ignoring", path.display());
                None
            }
        };

        Ok(SlideshowPlan {
            images,
            seconds_per_image: seconds,
            audio,
            output: PathBuf::from(&self.output),
        })
    }
}

/// Collect qualifying image files directly inside `folder`.
///
/// Order is ascending lexicographic by filename, independent of the
/// filesystem enumeration order.
pub fn collect_images(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut images = vec![];

    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() && has_image_extension(&path) {
            images.push(path);
        }
    }

    images.sort_unstable();

    Ok(images)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn request_for(folder: &Path) -> JobRequest {
        JobRequest::default()
            .with_image_folder(folder.display().to_string())
            .with_output("/tmp/out.mp4".to_string())
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn test_collect_images_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.jpeg", "notes.txt", "b.JPG", "a.png", "clip.gif"] {
            touch(dir.path(), name);
        }

        let images = collect_images(dir.path()).unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();

        assert_eq!(names, vec!["a.png", "b.JPG", "c.jpeg"]);
    }

    #[test]
    fn test_collect_images_is_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "top.png");
        fs::create_dir(dir.path().join("nested")).unwrap();
        touch(&dir.path().join("nested"), "deep.png");

        let images = collect_images(dir.path()).unwrap();
        assert_eq!(images.len(), 1);
    }

    #[test]
    fn test_validate_rejects_empty_paths() {
        let err = JobRequest::default().validate().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = JobRequest::default()
            .with_image_folder("/tmp".to_string())
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_validate_rejects_bad_seconds_before_reading_images() {
        // folder deliberately does not exist; a seconds failure must win
        let request = JobRequest::default()
            .with_image_folder("/no/such/folder".to_string())
            .with_output("/tmp/out.mp4".to_string());

        for bad in ["abc", "0", "-1", "NaN", "inf", ""] {
            let err = request
                .clone()
                .with_seconds_per_image(bad.to_string())
                .validate()
                .unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)), "seconds `{bad}`");
        }
    }

    #[test]
    fn test_validate_rejects_empty_image_set() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "readme.md");

        let err = request_for(dir.path()).validate().unwrap_err();
        match err {
            Error::InvalidInput(msg) => assert!(msg.contains("no images")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_validate_builds_plan() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["1.jpg", "2.jpg", "3.jpg"] {
            touch(dir.path(), name);
        }

        let plan = request_for(dir.path())
            .with_seconds_per_image("2.5".to_string())
            .validate()
            .unwrap();

        assert_eq!(plan.images.len(), 3);
        assert_eq!(plan.seconds_per_image, 2.5);
        assert!(plan.audio.is_none());
        assert_eq!(plan.total_duration(), 7.5);
    }

    #[test]
    fn test_validate_ignores_missing_audio() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "1.jpg");

        let plan = request_for(dir.path())
            .with_audio_file("/no/such/song.mp3".to_string())
            .validate()
            .unwrap();
        assert!(plan.audio.is_none());

        let song = dir.path().join("song.mp3");
        fs::write(&song, b"x").unwrap();
        let plan = request_for(dir.path())
            .with_audio_file(song.display().to_string())
            .validate()
            .unwrap();
        assert_eq!(plan.audio, Some(song));
    }
}
