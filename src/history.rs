use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Ordered clipboard history, newest entry last, persisted as a YAML list.
///
/// Invariants: no empty strings, no two adjacent equal entries, length
/// bounded by the configured store cap (oldest dropped first).
pub struct History {
    path: PathBuf,
    entries: Vec<String>,
}

impl History {
    /// Load the history from disk. A missing, unreadable or malformed file
    /// is treated as an empty history.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_yaml::from_str::<Vec<String>>(&raw).ok())
            .unwrap_or_default();
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Create the file with an empty list if it does not exist yet.
    pub fn ensure_exists(path: &Path) -> Result<()> {
        if path.exists() {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Could not create {}", parent.display()))?;
        }
        fs::write(path, "[]\n").with_context(|| format!("Could not create {}", path.display()))
    }

    /// Append a clipboard capture, enforcing the invariants, then persist.
    ///
    /// Trailing newlines are stripped. Empty text and immediate duplicates
    /// of the current last entry are ignored; a value reappearing
    /// non-adjacently is stored again. Returns whether the history changed.
    pub fn append(&mut self, text: &str, cap: usize) -> Result<bool> {
        let text = text.trim_end_matches('\n');
        if text.is_empty() {
            return Ok(false);
        }
        if self.entries.last().map(String::as_str) == Some(text) {
            return Ok(false);
        }
        self.entries.push(text.to_owned());
        if cap > 0 && self.entries.len() > cap {
            self.entries.drain(..self.entries.len() - cap);
        }
        self.save()?;
        Ok(true)
    }

    /// Rewrite the whole sequence to disk. Last write wins; there is a
    /// single writer in practice.
    pub fn save(&self) -> Result<()> {
        let serialized =
            serde_yaml::to_string(&self.entries).context("Could not serialize history.")?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Could not write {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn empty_history(dir: &TempDir) -> History {
        History::load(dir.path().join("history.yaml"))
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        assert!(empty_history(&dir).entries().is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.yaml");
        fs::write(&path, "not: a\nlist: here\n").unwrap();
        assert!(History::load(&path).entries().is_empty());
    }

    #[test]
    fn append_persists_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let mut history = empty_history(&dir);
        assert!(history.append("first", 0).unwrap());
        assert!(history.append("second", 0).unwrap());
        let reloaded = History::load(history.path());
        assert_eq!(reloaded.entries(), ["first", "second"]);
    }

    #[test]
    fn adjacent_duplicate_is_suppressed() {
        let dir = TempDir::new().unwrap();
        let mut history = empty_history(&dir);
        assert!(history.append("x", 0).unwrap());
        assert!(!history.append("x", 0).unwrap());
        assert_eq!(history.entries().len(), 1);
    }

    #[test]
    fn non_adjacent_duplicate_is_stored_again() {
        let dir = TempDir::new().unwrap();
        let mut history = empty_history(&dir);
        history.append("x", 0).unwrap();
        history.append("y", 0).unwrap();
        history.append("x", 0).unwrap();
        assert_eq!(history.entries(), ["x", "y", "x"]);
    }

    #[test]
    fn empty_and_newline_only_text_is_ignored() {
        let dir = TempDir::new().unwrap();
        let mut history = empty_history(&dir);
        assert!(!history.append("", 0).unwrap());
        assert!(!history.append("\n\n", 0).unwrap());
        assert!(history.entries().is_empty());
    }

    #[test]
    fn trailing_newlines_are_trimmed_before_comparison() {
        let dir = TempDir::new().unwrap();
        let mut history = empty_history(&dir);
        assert!(history.append("value\n", 0).unwrap());
        assert_eq!(history.entries(), ["value"]);
        assert!(!history.append("value", 0).unwrap());
    }

    #[test]
    fn cap_keeps_most_recent_entries() {
        let dir = TempDir::new().unwrap();
        let mut history = empty_history(&dir);
        for i in 0..10 {
            history.append(&format!("entry-{i}"), 4).unwrap();
        }
        assert_eq!(
            history.entries(),
            ["entry-6", "entry-7", "entry-8", "entry-9"]
        );
        let reloaded = History::load(history.path());
        assert_eq!(reloaded.entries().len(), 4);
    }

    #[test]
    fn zero_cap_is_unlimited() {
        let dir = TempDir::new().unwrap();
        let mut history = empty_history(&dir);
        for i in 0..50 {
            history.append(&format!("{i}"), 0).unwrap();
        }
        assert_eq!(history.entries().len(), 50);
    }
}
