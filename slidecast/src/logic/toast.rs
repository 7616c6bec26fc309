//! Toast notifications with automatic timeout.

use crate::{
    global_store, global_util,
    slint_generatedAppWindow::{AppWindow, ToastStatus},
};
use slint::{ComponentHandle, Timer, TimerMode, Weak};

/// Show a warning toast.
#[macro_export]
macro_rules! toast_warn {
    ($ui:expr, $msg:expr) => {
        $ui.global::<$crate::slint_generatedAppWindow::Util>()
            .invoke_show_toast(
                slint::format!("{}", $msg),
                $crate::slint_generatedAppWindow::ToastStatus::Warning,
            )
    };
}

/// Show a success toast.
#[macro_export]
macro_rules! toast_success {
    ($ui:expr, $msg:expr) => {
        $ui.global::<$crate::slint_generatedAppWindow::Util>()
            .invoke_show_toast(
                slint::format!("{}", $msg),
                $crate::slint_generatedAppWindow::ToastStatus::Success,
            )
    };
}

/// Show an info toast.
#[allow(dead_code)]
#[macro_export]
macro_rules! toast_info {
    ($ui:expr, $msg:expr) => {
        $ui.global::<$crate::slint_generatedAppWindow::Util>()
            .invoke_show_toast(
                slint::format!("{}", $msg),
                $crate::slint_generatedAppWindow::ToastStatus::Info,
            )
    };
}

/// Show a warning toast from a non-UI thread.
pub fn async_toast_warn(ui: Weak<AppWindow>, msg: String) {
    let _ = slint::invoke_from_event_loop(move || {
        global_util!(ui.unwrap()).invoke_show_toast(slint::format!("{}", msg), ToastStatus::Warning);
    });
}

/// Show a success toast from a non-UI thread.
#[allow(dead_code)]
pub fn async_toast_success(ui: Weak<AppWindow>, msg: String) {
    let _ = slint::invoke_from_event_loop(move || {
        global_util!(ui.unwrap()).invoke_show_toast(slint::format!("{}", msg), ToastStatus::Success);
    });
}

pub fn init(ui: &AppWindow) {
    let timer = Timer::default();
    let ui_weak = ui.as_weak();
    global_util!(ui).on_show_toast(move |msg, status| {
        let ui = ui_weak.unwrap();

        if timer.running() {
            timer.stop();
        }

        // longer messages stay up longer
        let interval = if msg.chars().count() > 20 { 5 } else { 2 };

        global_store!(ui).set_toast_text(msg);
        global_store!(ui).set_toast_status(status);
        global_store!(ui).set_toast_visible(true);

        let ui_weak = ui.as_weak();
        timer.start(
            TimerMode::SingleShot,
            std::time::Duration::from_secs(interval),
            move || {
                global_store!(ui_weak.unwrap()).set_toast_visible(false);
            },
        );
    });

    let ui_weak = ui.as_weak();
    global_util!(ui).on_hide_toast(move || {
        global_store!(ui_weak.unwrap()).set_toast_visible(false);
    });
}
