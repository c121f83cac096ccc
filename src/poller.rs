use std::sync::Arc;
use std::thread;
use std::time::Duration;

use arboard::Clipboard;

use crate::app::App;

pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Change-by-inequality detection against the last observed clipboard
/// value. A failed read (`None`) is skipped without touching the baseline.
pub struct ChangeTracker {
    last_seen: Option<String>,
}

impl ChangeTracker {
    pub fn new(initial: Option<String>) -> Self {
        Self { last_seen: initial }
    }

    /// Returns the new value when it differs from the baseline, advancing
    /// the baseline either way. The baseline advances even while capture is
    /// disabled; gating happens in [`App::record`].
    pub fn observe(&mut self, current: Option<String>) -> Option<&str> {
        match current {
            Some(text) if self.last_seen.as_deref() != Some(text.as_str()) => {
                self.last_seen = Some(text);
                self.last_seen.as_deref()
            }
            _ => None,
        }
    }
}

/// Spawn the clipboard polling thread. `notify` is invoked after every
/// recorded change so the owner can rebuild the menu.
pub fn spawn(app: Arc<App>, notify: impl Fn() + Send + 'static) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut clipboard = match Clipboard::new() {
            Ok(clipboard) => clipboard,
            Err(clipboard_error) => {
                tracing::error!(
                    "Could not create a clipboard instance, the poller can not run: {clipboard_error}"
                );
                return;
            }
        };
        let mut tracker = ChangeTracker::new(clipboard.get_text().ok());
        tracing::info!("Watching for clipboard changes ...");

        while !app.is_shutdown() {
            if let Some(text) = tracker.observe(clipboard.get_text().ok()) {
                match app.record(text) {
                    Ok(true) => notify(),
                    Ok(false) => {}
                    Err(record_error) => {
                        tracing::error!("Could not record clipboard change: {record_error}");
                    }
                }
            }
            thread::sleep(POLL_INTERVAL);
        }
    })
}
