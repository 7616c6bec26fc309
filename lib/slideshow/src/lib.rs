//! # Slideshow Engine
//!
//! Turns a folder of still images, optionally backed by looping music, into
//! a single video file by driving the external `ffmpeg` binary.
//!
//! ## Pipeline
//!
//! One job is one linear pipeline: validate the request, collect and sort
//! the images, remove a stale output file, measure encode speed with a
//! short sample encode, then run the full encode with the same settings.
//! Progress is reported through typed [`JobEvent`]s so a UI thread can
//! consume them over a channel.
//!
//! ## Quick Start
//!
//! ```no_run
//! use slideshow::{EncodeConfig, JobRequest, run_job};
//!
//! let request = JobRequest::default()
//!     .with_image_folder("/photos/holiday".to_string())
//!     .with_audio_file("/music/song.mp3".to_string())
//!     .with_output("/videos/holiday.mp4".to_string())
//!     .with_seconds_per_image("2".to_string());
//!
//! let output = run_job(&request, &EncodeConfig::default(), |event| {
//!     println!("{event:?}");
//! });
//! ```

mod encoder;
mod estimate;
mod job;
mod plan;
mod progress;
mod runner;

pub use crossbeam::channel::{Receiver, Sender, bounded};
pub use encoder::{
    AudioSource, EncodeConfig, encode_slideshow, is_ffmpeg_installed, probe_media_duration,
    resolve_audio,
};
pub use estimate::{Estimate, estimate_encode_time};
pub use job::{IMAGE_EXTENSIONS, JobRequest, collect_images};
pub use plan::SlideshowPlan;
pub use progress::{JobEvent, ProgressThrottle};
pub use runner::run_job;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO Error {0}")]
    IO(#[from] std::io::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("FFmpeg Error: {0}")]
    Ffmpeg(String),
}
