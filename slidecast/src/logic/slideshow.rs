//! The slideshow job: form snapshot, worker thread, progress forwarding.
//!
//! The GENERATE button takes an immutable snapshot of the form fields,
//! spawns one worker thread for the whole pipeline and routes its progress
//! events back onto the UI thread over a bounded channel. Only one job can
//! run at a time; the button stays disabled until the completion update,
//! which runs on success and failure alike.

use crate::{
    config, global_store,
    logic::toast::async_toast_warn,
    logic_cb,
    slint_generatedAppWindow::AppWindow,
    toast_success, toast_warn,
};
use anyhow::{Result, bail};
use slint::{ComponentHandle, SharedString, Weak};
use slideshow::{EncodeConfig, JobEvent, JobRequest, ProgressThrottle, Receiver, bounded};
use std::{path::PathBuf, thread, time::Duration};

/// Encode-progress redraws are throttled to this fixed interval.
const PROGRESS_UPDATE_INTERVAL: Duration = Duration::from_secs(5);

const EVENT_QUEUE_SIZE: usize = 16;

pub fn init(ui: &AppWindow) {
    inner_init(ui);

    logic_cb!(choose_image_folder, ui);
    logic_cb!(choose_audio_file, ui);
    logic_cb!(choose_save_file, ui);
    logic_cb!(start_generate, ui);
    logic_cb!(open_file, ui, file);
}

fn inner_init(ui: &AppWindow) {
    let conf = config::all().slideshow;
    global_store!(ui).set_image_folder(conf.image_folder.into());
    global_store!(ui).set_audio_file(conf.audio_file.into());
    global_store!(ui).set_save_file(conf.save_file.into());
    global_store!(ui).set_seconds_per_image(conf.seconds_per_image.into());

    if !slideshow::is_ffmpeg_installed() {
        toast_warn!(ui, "ffmpeg not found in PATH; generating will fail");
    }
}

fn choose_image_folder(ui: &AppWindow) {
    let ui_weak = ui.as_weak();

    tokio::spawn(async move {
        let result = native_dialog::DialogBuilder::file()
            .set_title("Choose image folder")
            .open_single_dir()
            .show();

        let Some(dir) = picked_path(ui_weak.clone(), result) else {
            return;
        };

        _ = ui_weak.upgrade_in_event_loop(move |ui| {
            global_store!(ui).set_image_folder(dir.to_string_lossy().to_string().into());
        });
    });
}

fn choose_audio_file(ui: &AppWindow) {
    let ui_weak = ui.as_weak();

    tokio::spawn(async move {
        let result = native_dialog::DialogBuilder::file()
            .set_title("Choose background music")
            .add_filter("Audio", ["mp3", "wav"])
            .open_single_file()
            .show();

        let Some(file) = picked_path(ui_weak.clone(), result) else {
            return;
        };

        _ = ui_weak.upgrade_in_event_loop(move |ui| {
            global_store!(ui).set_audio_file(file.to_string_lossy().to_string().into());
        });
    });
}

fn choose_save_file(ui: &AppWindow) {
    let ui_weak = ui.as_weak();

    tokio::spawn(async move {
        let result = native_dialog::DialogBuilder::file()
            .set_title("Save video as")
            .set_filename("slideshow.mp4")
            .add_filter("MP4 video", ["mp4"])
            .save_single_file()
            .show();

        let Some(file) = picked_path(ui_weak.clone(), result) else {
            return;
        };

        _ = ui_weak.upgrade_in_event_loop(move |ui| {
            global_store!(ui).set_save_file(file.to_string_lossy().to_string().into());
        });
    });
}

fn picked_path(
    ui: Weak<AppWindow>,
    result: std::result::Result<Option<PathBuf>, native_dialog::Error>,
) -> Option<PathBuf> {
    match result {
        Ok(Some(path)) => Some(path),
        Ok(None) => None,
        Err(e) => {
            async_toast_warn(ui, format!("Choose file failed. Reason: {e}"));
            None
        }
    }
}

fn start_generate(ui: &AppWindow) {
    if global_store!(ui).get_running() {
        return;
    }

    // immutable snapshot; the worker never reads live form fields
    let request = JobRequest::default()
        .with_image_folder(global_store!(ui).get_image_folder().to_string())
        .with_audio_file(global_store!(ui).get_audio_file().to_string())
        .with_output(global_store!(ui).get_save_file().to_string())
        .with_seconds_per_image(global_store!(ui).get_seconds_per_image().to_string());

    let mut all = config::all();
    all.slideshow.image_folder = request.image_folder.clone();
    all.slideshow.audio_file = request.audio_file.clone();
    all.slideshow.save_file = request.output.clone();
    all.slideshow.seconds_per_image = request.seconds_per_image.clone();
    _ = config::save(all);

    global_store!(ui).set_running(true);
    global_store!(ui).set_indeterminate(true);
    global_store!(ui).set_progress(0.0);
    global_store!(ui).set_estimate_text(SharedString::default());
    global_store!(ui).set_result_file(SharedString::default());
    global_store!(ui).set_status_text("Rendering... (this may take a while)".into());

    let ui_weak = ui.as_weak();
    thread::spawn(move || {
        let result = run_worker(ui_weak.clone(), request);

        _ = ui_weak.upgrade_in_event_loop(move |ui| {
            match result {
                Ok(output) => {
                    global_store!(ui).set_status_text("Success".into());
                    global_store!(ui).set_progress(1.0);
                    global_store!(ui).set_result_file(output.clone().into());
                    toast_success!(ui, format!("Video saved to `{output}`"));
                }
                Err(e) => {
                    global_store!(ui).set_status_text("Error".into());
                    toast_warn!(ui, format!("{e}"));
                }
            }

            // the form must come back ready on every path
            global_store!(ui).set_indeterminate(false);
            global_store!(ui).set_running(false);
        });
    });
}

fn run_worker(ui_weak: Weak<AppWindow>, request: JobRequest) -> Result<String> {
    log::info!("start generating...");

    if !slideshow::is_ffmpeg_installed() {
        bail!("ffmpeg not found in PATH");
    }

    let (event_sender, event_receiver) = bounded(EVENT_QUEUE_SIZE);

    let forwarder = thread::spawn(move || forward_events(ui_weak, event_receiver));

    let result = slideshow::run_job(&request, &EncodeConfig::default(), |event| {
        _ = event_sender.send(event);
    });

    drop(event_sender);
    _ = forwarder.join();

    let output = result?;
    log::info!("generating completed successfully");

    Ok(output.display().to_string())
}

fn forward_events(ui_weak: Weak<AppWindow>, events: Receiver<JobEvent>) {
    let mut throttle = ProgressThrottle::new(PROGRESS_UPDATE_INTERVAL);

    while let Ok(event) = events.recv() {
        // progress ticks are rate limited; state changes always land
        if matches!(event, JobEvent::Encoding(_)) && !throttle.ready() {
            continue;
        }

        _ = ui_weak.upgrade_in_event_loop(move |ui| match event {
            JobEvent::Assembling { images, total_secs } => {
                global_store!(ui).set_status_text(slint::format!(
                    "Rendering {images} image(s), {total_secs:.0}s of video..."
                ));
            }
            JobEvent::Estimating => {
                global_store!(ui).set_status_text("Measuring encode speed...".into());
            }
            JobEvent::Estimated(estimate) => {
                global_store!(ui).set_estimate_text(estimate.display().into());
                global_store!(ui).set_indeterminate(false);
            }
            JobEvent::Encoding(progress) => {
                global_store!(ui).set_status_text("Encoding...".into());
                global_store!(ui).set_progress(progress);
            }
        });
    }

    log::info!("exit slideshow event forwarder");
}

fn open_file(ui: &AppWindow, file: SharedString) {
    if file.is_empty() {
        return;
    }

    if let Err(e) = open::that_detached(file.as_str()) {
        toast_warn!(ui, format!("Open file failed: `{file}`. {e}"));
    }
}
