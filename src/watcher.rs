use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};

use crate::app::App;

pub const WATCH_INTERVAL: Duration = Duration::from_secs(1);

/// Modification-time tracker for a single file. A failed stat is treated
/// as "no change this tick".
pub struct FileWatch {
    path: PathBuf,
    last_seen: Option<SystemTime>,
}

impl FileWatch {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let last_seen = modified(&path);
        Self { path, last_seen }
    }

    pub fn changed(&mut self) -> bool {
        let Some(current) = modified(&self.path) else {
            return false;
        };
        if self.last_seen == Some(current) {
            return false;
        }
        self.last_seen = Some(current);
        true
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

/// Spawn the file-watching thread: on an external edit of the config file
/// the settings are reloaded, on an edit of the history file the history is
/// reloaded; either way `notify` requests a menu rebuild. Every step is
/// best-effort so one failure never halts the loop.
pub fn spawn(app: Arc<App>, notify: impl Fn() + Send + 'static) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut config_watch = FileWatch::new(app.config().path());
        let mut history_watch = FileWatch::new(app.history_path());
        tracing::info!("Watching config and history files for external changes ...");

        while !app.is_shutdown() {
            if config_watch.changed() {
                tracing::info!("Config file changed on disk, reloading settings ...");
                app.reload_settings();
                notify();
            }
            if history_watch.changed() {
                tracing::info!("History file changed on disk, reloading history ...");
                app.reload_history();
                notify();
            }
            thread::sleep(WATCH_INTERVAL);
        }
    })
}
