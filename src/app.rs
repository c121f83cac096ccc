use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;

use crate::config::{ConfigStore, Settings};
use crate::history::History;
use crate::menu::{self, MenuLayout};

/// Shared application state, one instance behind an `Arc` for the event
/// loop and both background threads.
pub struct App {
    config: ConfigStore,
    history: Mutex<History>,
    settings: Mutex<Settings>,
    capture: AtomicBool,
    shutdown: AtomicBool,
}

impl App {
    pub fn new(config: ConfigStore, history_path: PathBuf) -> Self {
        let settings = Settings::load(&config);
        Self {
            config,
            history: Mutex::new(History::load(history_path)),
            settings: Mutex::new(settings),
            capture: AtomicBool::new(settings.capture),
            shutdown: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub fn history_path(&self) -> PathBuf {
        lock(&self.history).path().to_path_buf()
    }

    pub fn capture_enabled(&self) -> bool {
        self.capture.load(Ordering::SeqCst)
    }

    /// Flip the capture flag and persist it to the config file. Returns the
    /// new state.
    pub fn toggle_capture(&self) -> Result<bool> {
        let enabled = !self.capture.fetch_xor(true, Ordering::SeqCst);
        self.config.set("capture", enabled)?;
        Ok(enabled)
    }

    /// Record a detected clipboard change. A no-op while capture is
    /// disabled; the poller keeps advancing its baseline regardless, so
    /// re-enabling capture does not replay missed entries.
    pub fn record(&self, text: &str) -> Result<bool> {
        if !self.capture_enabled() {
            return Ok(false);
        }
        let cap = lock(&self.settings).store;
        lock(&self.history).append(text, cap)
    }

    pub fn reload_settings(&self) {
        let settings = Settings::load(&self.config);
        self.capture.store(settings.capture, Ordering::SeqCst);
        *lock(&self.settings) = settings;
    }

    pub fn reload_history(&self) {
        let path = self.history_path();
        *lock(&self.history) = History::load(path);
    }

    pub fn layout(&self) -> MenuLayout {
        let history = lock(&self.history);
        let settings = *lock(&self.settings);
        menu::build_layout(history.entries(), &settings, self.capture_enabled())
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

/// A poisoned lock here just means another thread panicked mid-mutation of
/// a plain list or scalar; the data is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
