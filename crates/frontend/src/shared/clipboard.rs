//! Clipboard utilities for copying text to clipboard
//!
//! Uses the Web Clipboard API and reports the outcome in a dialog.

use wasm_bindgen_futures::spawn_local;

use super::feedback::show_dialog;

pub const COPY_SUCCEEDED: &str = "クリップボードにコピーしました";
pub const COPY_FAILED: &str = "コピーに失敗しました";

/// Write `text` to the clipboard
pub async fn write_text(text: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("no window")?;
    let clipboard = window.navigator().clipboard();
    wasm_bindgen_futures::JsFuture::from(clipboard.write_text(text))
        .await
        .map(|_| ())
        .map_err(|e| format!("{:?}", e))
}

/// Copy text to the system clipboard, then show a confirmation or failure
/// dialog.
///
/// # Example
/// ```rust,ignore
/// copy_to_clipboard("https://example.com/manuals/view.py?id=3");
/// ```
pub fn copy_to_clipboard(text: &str) {
    let text = text.to_owned();
    spawn_local(async move {
        match write_text(&text).await {
            Ok(()) => show_dialog(COPY_SUCCEEDED),
            Err(e) => {
                log::warn!("Clipboard write failed: {}", e);
                show_dialog(COPY_FAILED);
            }
        }
    });
}
