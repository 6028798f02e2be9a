use crate::storage;
use anyhow::Result;
use std::sync::mpsc as std_mpsc;
use std::sync::OnceLock;
use std::time::Duration;

use super::state::UiState;

// Global clipboard manager channel - initialized once on first use
static CLIPBOARD_SENDER: OnceLock<std_mpsc::Sender<String>> = OnceLock::new();

/// Save the displayed result to the default export directory and report the path.
pub fn save_and_show_path(state: &mut UiState) {
    let Some(record) = state.last_record.as_ref() else {
        state.info = "No completed analysis to save yet.".into();
        return;
    };
    match storage::save_record(&storage::default_export_dir(), record) {
        Ok(path) => state.info = format!("Saved: {}", path.display()),
        Err(e) => state.info = format!("Save failed: {e:#}"),
    }
}

/// Copy the displayed profile URL to the clipboard.
pub fn copy_profile_url(state: &mut UiState) {
    let Some(url) = state
        .session
        .displayed_result()
        .map(|r| r.profile_url.clone())
    else {
        state.info = "No profile URL to copy yet.".into();
        return;
    };
    state.info = match copy_to_clipboard(&url) {
        Ok(()) => format!("✓ Copied to clipboard: {url}"),
        Err(e) => format!("Clipboard copy failed: {e:#}"),
    };
}

/// Initialize the clipboard manager thread if not already initialized.
/// Operations run sequentially on one thread, each clipboard instance kept alive
/// long enough for clipboard managers to read it.
fn init_clipboard_manager() -> Result<&'static std_mpsc::Sender<String>> {
    CLIPBOARD_SENDER.get_or_init(|| {
        let (tx, rx) = std_mpsc::channel::<String>();

        std::thread::spawn(move || {
            use arboard::Clipboard;

            for text in rx {
                if let Ok(mut clipboard) = Clipboard::new() {
                    if clipboard.set_text(&text).is_ok() {
                        // Linux clipboards are owned by the writer; keep it alive for readers.
                        std::thread::sleep(Duration::from_secs(2));
                    }
                }
            }
        });

        tx
    });

    CLIPBOARD_SENDER
        .get()
        .ok_or_else(|| anyhow::anyhow!("Failed to initialize clipboard manager"))
}

/// Queue text for the clipboard without blocking the UI thread.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let sender = init_clipboard_manager()?;
    sender
        .send(text.to_string())
        .map_err(|_| anyhow::anyhow!("Clipboard manager channel closed"))?;
    Ok(())
}
