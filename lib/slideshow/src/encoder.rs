//! FFmpeg invocation
//!
//! The engine shells out to the external `ffmpeg` binary. The visual track
//! comes from a concat-demuxer script (one entry per image), scaled onto a
//! fixed canvas with letterbox/pillarbox fill; the audio track is looped
//! with `-stream_loop` and cut to the exact video duration with `-t`.

use crate::{Error, Result, plan::SlideshowPlan};
use derivative::Derivative;
use derive_setters::Setters;
use ffmpeg_sidecar::{
    command::FfmpegCommand,
    event::{FfmpegEvent, FfmpegProgress, LogLevel},
};
use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

/// Encoder settings shared by the sample encode and the full encode.
///
/// The estimate stays honest only if both runs use the same settings, so
/// one config value is built per job and passed to both.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct EncodeConfig {
    /// Canvas width; images are scaled to fit and padded with black
    #[derivative(Default(value = "1920"))]
    pub width: u32,
    /// Canvas height
    #[derivative(Default(value = "1080"))]
    pub height: u32,
    /// Output frame rate
    #[derivative(Default(value = "24"))]
    pub fps: u32,
    #[derivative(Default(value = "\"libx264\".to_string()"))]
    pub video_codec: String,
    #[derivative(Default(value = "\"aac\".to_string()"))]
    pub audio_codec: String,
    /// Encoder speed preset; the fastest one, matching the sample encode
    #[derivative(Default(value = "\"ultrafast\".to_string()"))]
    pub preset: String,
    /// Encoding threads; a single thread keeps the estimate comparable
    #[derivative(Default(value = "1"))]
    pub threads: u32,
    /// Video bitrate in bps (None leaves it to the encoder)
    #[derivative(Default(value = "None"))]
    pub video_bitrate: Option<usize>,
    /// Audio bitrate in bps
    #[derivative(Default(value = "Some(128_000)"))]
    pub audio_bitrate: Option<usize>,
}

/// One audio input and how often it loops.
///
/// Resolved once per job with [`resolve_audio`] and reused by the sample
/// encode and the full encode, so the audio file is probed a single time.
#[derive(Debug, Clone)]
pub struct AudioSource {
    pub path: PathBuf,
    /// Extra plays after the first; None loops until the output cut
    pub extra_loops: Option<u32>,
}

/// Check that the `ffmpeg` binary is available in the system PATH.
pub fn is_ffmpeg_installed() -> bool {
    ffmpeg_sidecar::command::ffmpeg_is_installed()
}

/// Encode the plan's timeline to `output`, cut to `cut_secs` seconds.
///
/// The full encode passes the plan's total duration as `cut_secs`; the
/// sample encode passes the sample duration and a throwaway output path.
/// `progress_cb` receives fractions in `0..=1` derived from ffmpeg's
/// progress reports.
pub fn encode_slideshow(
    plan: &SlideshowPlan,
    config: &EncodeConfig,
    audio: Option<&AudioSource>,
    output: &Path,
    cut_secs: f64,
    mut progress_cb: impl FnMut(f32),
) -> Result<()> {
    let workdir = tempfile::tempdir()?;
    let script = workdir.path().join("slideshow.ffconcat");
    fs::write(&script, plan.concat_script())?;

    let args = build_encode_args(config, &script, audio, cut_secs);

    let mut cmd = FfmpegCommand::new();
    cmd.args(&args);

    let mut child = cmd
        .overwrite()
        .output(output.display().to_string())
        .print_command()
        .spawn()
        .map_err(|e| Error::Ffmpeg(format!("ffmpeg spawn child process failed. {e}")))?;

    let iter = child
        .iter()
        .map_err(|e| Error::Ffmpeg(format!("ffmpeg iter failed. {e}")))?;

    let mut last_error = None;
    for event in iter {
        match event {
            FfmpegEvent::Progress(FfmpegProgress { time, .. }) => match parse_timestamp(&time) {
                Ok(secs) if secs > 0.0 && cut_secs > 0.0 => {
                    progress_cb((secs / cut_secs).min(1.0) as f32);
                }
                Err(e) => log::debug!("{e}"),
                _ => (),
            },
            FfmpegEvent::Error(e) => last_error = Some(e),
            FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, msg) => last_error = Some(msg),
            _ => (),
        }
    }

    let status = child
        .wait()
        .map_err(|e| Error::Ffmpeg(format!("ffmpeg wait failed. {e}")))?;

    if !status.success() {
        return Err(Error::Ffmpeg(
            last_error.unwrap_or_else(|| format!("ffmpeg exited with {status}")),
        ));
    }

    progress_cb(1.0);

    Ok(())
}

/// Probe the duration of a media file in seconds via `ffprobe`.
pub fn probe_media_duration(path: &Path) -> Result<f64> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output()?;

    if !output.status.success() {
        return Err(Error::Ffmpeg(format!(
            "ffprobe failed for `{}`: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let text = String::from_utf8_lossy(&output.stdout);
    text.trim()
        .parse::<f64>()
        .map_err(|_| Error::Ffmpeg(format!("unexpected ffprobe output `{}`", text.trim())))
}

/// Resolve the plan's audio into an [`AudioSource`], probing its duration.
///
/// Called once per job; the result feeds both the sample encode and the
/// full encode.
pub fn resolve_audio(plan: &SlideshowPlan) -> Option<AudioSource> {
    plan.audio.as_ref().map(|path| AudioSource {
        path: path.clone(),
        extra_loops: audio_extra_loops(plan, path),
    })
}

fn audio_extra_loops(plan: &SlideshowPlan, path: &Path) -> Option<u32> {
    match probe_media_duration(path) {
        Ok(secs) if secs > 0.0 => {
            let repeats = plan.loop_repetitions(secs);
            log::info!(
                "audio `{}` is {secs:.1}s, playing {repeats} time(s) to cover {:.1}s of video",
                path.display(),
                plan.total_duration()
            );
            Some(repeats - 1)
        }
        Ok(secs) => {
            log::warn!(
                "ffprobe reported duration {secs} for `{}`, looping until cut",
                path.display()
            );
            None
        }
        Err(e) => {
            log::warn!("probe audio duration failed, looping until cut. {e}");
            None
        }
    }
}

pub(crate) fn build_encode_args(
    config: &EncodeConfig,
    script: &Path,
    audio: Option<&AudioSource>,
    cut_secs: f64,
) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-f".into(),
        "concat".into(),
        "-safe".into(),
        "0".into(),
        "-i".into(),
        script.display().to_string(),
    ];

    if let Some(audio) = audio {
        let loops = match audio.extra_loops {
            Some(n) => n.to_string(),
            None => "-1".to_string(),
        };
        args.extend([
            "-stream_loop".into(),
            loops,
            "-i".into(),
            audio.path.display().to_string(),
        ]);
    }

    let (w, h, fps) = (config.width, config.height, config.fps);
    args.extend([
        "-vf".into(),
        format!(
            "scale={w}:{h}:force_original_aspect_ratio=decrease,\
             pad={w}:{h}:(ow-iw)/2:(oh-ih)/2:color=black,setsar=1,fps={fps},format=yuv420p"
        ),
        "-map".into(),
        "0:v".into(),
    ]);

    if audio.is_some() {
        args.extend(["-map".into(), "1:a".into()]);
    }

    args.extend([
        "-c:v".into(),
        config.video_codec.clone(),
        "-preset".into(),
        config.preset.clone(),
        "-threads".into(),
        config.threads.to_string(),
    ]);

    if let Some(bitrate) = config.video_bitrate {
        args.extend(["-b:v".into(), bitrate.to_string()]);
    }

    if audio.is_some() {
        args.extend(["-c:a".into(), config.audio_codec.clone()]);
        if let Some(bitrate) = config.audio_bitrate {
            args.extend(["-b:a".into(), bitrate.to_string()]);
        }
    }

    args.extend(["-t".into(), format!("{cut_secs}")]);

    args
}

/// Parse an ffmpeg progress timestamp (`HH:MM:SS.mmm`) into seconds.
fn parse_timestamp(timestamp: &str) -> Result<f64> {
    let parts: Vec<&str> = timestamp.split(':').collect();
    if parts.len() != 3 {
        return Err(Error::Ffmpeg(format!("invalid timestamp `{timestamp}`")));
    }

    let hours: f64 = parts[0]
        .parse()
        .map_err(|_| Error::Ffmpeg(format!("invalid hours in `{timestamp}`")))?;
    let minutes: f64 = parts[1]
        .parse()
        .map_err(|_| Error::Ffmpeg(format!("invalid minutes in `{timestamp}`")))?;
    let seconds: f64 = parts[2]
        .parse()
        .map_err(|_| Error::Ffmpeg(format!("invalid seconds in `{timestamp}`")))?;

    Ok(hours * 3600.0 + minutes * 60.0 + seconds)
}
