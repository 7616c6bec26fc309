//! Slidecast
//!
//! A small slint desktop application that turns a folder of still images
//! into a slideshow video, optionally backed by looping music. Encoding is
//! delegated to the `slideshow` engine crate, which drives the external
//! `ffmpeg` binary on a background worker thread.

slint::include_modules!();

#[macro_use]
extern crate derivative;

mod config;
mod logic;

/// Installs the logger with timestamp, level, file and line in each record.
pub fn init_logger() {
    use std::io::Write;

    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

async fn ui_before() {
    init_logger();
    config::init();

    #[cfg(target_os = "linux")]
    {
        _ = slint::set_xdg_app_id("slidecast".to_string());
    }
}

fn ui_after(ui: &AppWindow) {
    use slint::ComponentHandle;

    let preference = config::all().preference;
    ui.window().set_size(slint::LogicalSize::new(
        preference.win_width as f32,
        preference.win_height as f32,
    ));

    logic::init(ui);
}

/// Desktop entry point: logger, config, window, event loop.
pub async fn desktop_main() {
    log::debug!("start...");

    ui_before().await;
    let ui = AppWindow::new().unwrap();
    ui_after(&ui);

    ui.run().unwrap();

    log::debug!("exit...");
}
