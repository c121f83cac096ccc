use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};

const DEFAULT_DISPLAY_LIMIT: usize = 3;
const DEFAULT_OVERFLOW_EXTRA: usize = 5;
const DEFAULT_STORE_CAP: usize = 0; // 0 = unlimited
const DEFAULT_CAPTURE: bool = true;

/// Flat key-value config document backed by a YAML file.
///
/// Reads treat a missing or corrupt file as an empty mapping; writes merge
/// the new key into whatever is already on disk, so keys this program does
/// not recognize survive a round trip.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with an empty document if it does not exist yet.
    pub fn ensure_exists(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Could not create {}", parent.display()))?;
        }
        fs::write(&self.path, "{}\n")
            .with_context(|| format!("Could not create {}", self.path.display()))
    }

    fn read_document(&self) -> Mapping {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Mapping::new();
        };
        match serde_yaml::from_str::<Value>(&raw) {
            Ok(Value::Mapping(map)) => map,
            _ => Mapping::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.read_document().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.read_document()
            .keys()
            .filter_map(|k| k.as_str().map(str::to_owned))
            .collect()
    }

    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        let mut document = self.read_document();
        document.insert(Value::from(key), value.into());
        let serialized = serde_yaml::to_string(&document)
            .context("Could not serialize config document.")?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Could not write {}", self.path.display()))
    }
}

/// Typed view of the recognized config keys, defaults applied per key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Number of most-recent entries shown directly in the menu.
    pub limit: usize,
    /// Cutoff beyond which entries are not shown even in the overflow
    /// submenu. The `max` key holds the extra count added to `limit`.
    pub max: usize,
    /// Cap on persisted history length, 0 for unlimited.
    pub store: usize,
    pub capture: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            limit: DEFAULT_DISPLAY_LIMIT,
            max: DEFAULT_DISPLAY_LIMIT + DEFAULT_OVERFLOW_EXTRA,
            store: DEFAULT_STORE_CAP,
            capture: DEFAULT_CAPTURE,
        }
    }
}

impl Settings {
    pub fn load(store: &ConfigStore) -> Self {
        let limit = non_negative(store.get("limit")).unwrap_or(DEFAULT_DISPLAY_LIMIT);
        let extra = non_negative(store.get("max")).unwrap_or(DEFAULT_OVERFLOW_EXTRA);
        let cap = non_negative(store.get("store")).unwrap_or(DEFAULT_STORE_CAP);
        let capture = store
            .get("capture")
            .and_then(|v| v.as_bool())
            .unwrap_or(DEFAULT_CAPTURE);
        Self {
            limit,
            max: limit + extra,
            store: cap,
            capture,
        }
    }
}

/// Accepts only non-negative integers; anything else falls back to the
/// caller's default.
fn non_negative(value: Option<Value>) -> Option<usize> {
    value
        .as_ref()
        .and_then(Value::as_u64)
        .map(|n| n as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ConfigStore {
        ConfigStore::new(dir.path().join("config.yaml"))
    }

    #[test]
    fn get_on_missing_file_is_absent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.get("limit"), None);
        assert!(store.keys().is_empty());
    }

    #[test]
    fn set_then_get_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set("limit", 7).unwrap();
        assert_eq!(store.get("limit"), Some(Value::from(7)));
        assert_eq!(store.keys(), vec!["limit".to_string()]);
    }

    #[test]
    fn set_merges_instead_of_overwriting() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "custom: hello\nlimit: 2\n").unwrap();
        store.set("store", 10).unwrap();
        assert_eq!(store.get("custom"), Some(Value::from("hello")));
        assert_eq!(store.get("limit"), Some(Value::from(2)));
        assert_eq!(store.get("store"), Some(Value::from(10)));
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), ": not [ yaml {").unwrap();
        assert_eq!(store.get("limit"), None);
        // A non-mapping document counts as corrupt too.
        fs::write(store.path(), "- just\n- a\n- list\n").unwrap();
        assert!(store.keys().is_empty());
    }

    #[test]
    fn settings_defaults_when_unset() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(&store_in(&dir));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.limit, 3);
        assert_eq!(settings.max, 8);
        assert_eq!(settings.store, 0);
        assert!(settings.capture);
    }

    #[test]
    fn settings_reads_recognized_keys() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set("limit", 5).unwrap();
        store.set("max", 2).unwrap();
        store.set("store", 50).unwrap();
        store.set("capture", false).unwrap();
        let settings = Settings::load(&store);
        assert_eq!(settings.limit, 5);
        assert_eq!(settings.max, 7); // limit + extra
        assert_eq!(settings.store, 50);
        assert!(!settings.capture);
    }

    #[test]
    fn settings_falls_back_per_key_on_malformed_values() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set("limit", "three").unwrap();
        store.set("max", -4).unwrap();
        store.set("store", 9).unwrap();
        let settings = Settings::load(&store);
        assert_eq!(settings.limit, 3);
        assert_eq!(settings.max, 8);
        assert_eq!(settings.store, 9);
    }
}
