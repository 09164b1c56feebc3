//! Alert banners and blocking dialogs.
//!
//! Banners are plain `<div class="alert alert-…">` nodes inserted at the top
//! of the page container. Removal timers are never cancelled; removing a
//! node that is already detached is a no-op.

use std::fmt::Display;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;

use super::config::FeedbackConfig;

/// Shown when an error has no message of its own
pub const GENERIC_ERROR: &str = "エラーが発生しました";
/// Default text of the delete confirmation
pub const CONFIRM_DELETE: &str = "本当に削除しますか？この操作は取り消せません。";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Unknown names map to `Info`
    pub fn parse(name: &str) -> Self {
        match name {
            "success" => Severity::Success,
            "warning" => Severity::Warning,
            "error" | "danger" => Severity::Error,
            _ => Severity::Info,
        }
    }

    pub fn class_name(self) -> String {
        format!("alert alert-{}", self.as_str())
    }
}

/// Text for an error banner
pub fn error_message(error: &dyn Display) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        GENERIC_ERROR.to_string()
    } else {
        message
    }
}

fn document() -> Option<web_sys::Document> {
    web_sys::window()?.document()
}

/// Insert a banner as the first child of the page container and remove it
/// after `alert_timeout_ms`. Does nothing if the container is missing.
pub fn show_alert(message: &str, severity: Severity, config: &FeedbackConfig) {
    let Some(document) = document() else {
        return;
    };
    let container = match document.query_selector(&config.container_selector) {
        Ok(Some(container)) => container,
        _ => {
            log::warn!("No {} to show alert in", config.container_selector);
            return;
        }
    };
    let Ok(alert) = document.create_element("div") else {
        return;
    };
    alert.set_class_name(&severity.class_name());
    alert.set_text_content(Some(message));

    let first = container.first_child();
    if let Err(e) = container.insert_before(&alert, first.as_ref()) {
        log::warn!("Failed to insert alert: {:?}", e);
        return;
    }

    Timeout::new(config.alert_timeout_ms, move || alert.remove()).forget();
}

/// Banner text for a value thrown by page script: the `Error` message if
/// it has one, otherwise the thrown string.
pub fn thrown_message(message: Option<String>, thrown: Option<String>) -> String {
    error_message(&message.or(thrown).unwrap_or_default())
}

/// Log `error` and show it as an error banner
pub fn handle_error(error: &dyn Display, config: &FeedbackConfig) {
    log::error!("Error: {}", error);
    show_alert(&error_message(error), Severity::Error, config);
}

/// Fade out and remove every banner present at page load.
///
/// Each banner goes transparent after `alert_timeout_ms` and leaves the DOM
/// `flash_fade_ms` later, once the CSS transition has run.
pub fn dismiss_flash_messages(config: &FeedbackConfig) {
    let Some(document) = document() else {
        return;
    };
    let Ok(alerts) = document.query_selector_all(".alert") else {
        return;
    };

    let fade_ms = config.flash_fade_ms;
    for i in 0..alerts.length() {
        let Some(alert) = alerts
            .item(i)
            .and_then(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            continue;
        };
        Timeout::new(config.alert_timeout_ms, move || {
            let _ = alert.style().set_property("opacity", "0");
            Timeout::new(fade_ms, move || alert.remove()).forget();
        })
        .forget();
    }
}

/// Blocking `alert()` dialog
pub fn show_dialog(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// Blocking `confirm()` dialog; `None` uses the default delete warning.
/// Returns `false` when no window is available.
pub fn confirm_delete(message: Option<&str>) -> bool {
    let message = match message {
        Some(m) if !m.is_empty() => m,
        _ => CONFIRM_DELETE,
    };
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}
