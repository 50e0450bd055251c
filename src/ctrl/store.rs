//! Durable prompt/command history.
//!
//! Two newline-delimited JSON logs live under the user data directory:
//! `history.jsonl` records every accepted prompt/command pair, and
//! `rejected.jsonl` is an append-only audit trail of every pair the user
//! explicitly deleted. Appends accumulate duplicates; de-duplication happens
//! at load time, keeping the most recently written occurrence.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A single accepted prompt/command pair.
///
/// Identity is content: two entries with the same prompt and command are the
/// same entry, and there is no other identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub prompt: String,
    pub command: String,
}

impl HistoryEntry {
    pub fn new(prompt: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            command: command.into(),
        }
    }
}

pub struct HistoryStore {
    history_path: PathBuf,
    rejected_path: PathBuf,
}

impl HistoryStore {
    /// Store under `<user data dir>/cmdgen`, creating the directory if
    /// needed.
    pub fn open_default() -> Result<Self> {
        let dir = dirs::data_dir()
            .context("no user data directory available")?
            .join("cmdgen");
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating data directory {}", dir.display()))?;
        Ok(Self::at(&dir))
    }

    /// Store rooted at an explicit directory.
    pub fn at(dir: &Path) -> Self {
        Self {
            history_path: dir.join("history.jsonl"),
            rejected_path: dir.join("rejected.jsonl"),
        }
    }

    /// Load the history, most recent first, duplicates removed keeping the
    /// most recently appended occurrence. A missing or unreadable file is an
    /// empty history, never an error.
    pub fn load(&self) -> Vec<HistoryEntry> {
        let mut entries = self.load_raw();
        entries.reverse();
        let mut seen = HashSet::new();
        entries.retain(|entry| seen.insert(entry.clone()));
        entries
    }

    /// Append one entry to the history log. No de-duplication happens here.
    pub fn append(&self, entry: &HistoryEntry) -> Result<()> {
        append_record(&self.history_path, entry)
    }

    /// Delete every occurrence of `entry` from the history log.
    ///
    /// The entry is recorded in the rejected log first, whether or not it was
    /// present in the history log. An empty or absent history log is left
    /// untouched after the rejection record.
    pub fn delete(&self, entry: &HistoryEntry) -> Result<()> {
        append_record(&self.rejected_path, entry).context("logging rejected entry")?;

        let mut entries = self.load_raw();
        if entries.is_empty() {
            return Ok(());
        }
        entries.retain(|e| e != entry);
        self.rewrite(&entries)
    }

    /// Raw log contents in append order, malformed lines skipped.
    fn load_raw(&self) -> Vec<HistoryEntry> {
        let file = match File::open(&self.history_path) {
            Ok(file) => file,
            Err(_) => return Vec::new(),
        };
        let mut entries = Vec::new();
        for line in BufReader::new(file).lines() {
            let Ok(line) = line else { break };
            match serde_json::from_str(&line) {
                Ok(entry) => entries.push(entry),
                Err(_) => continue, // skip malformed lines
            }
        }
        entries
    }

    /// Rewrite the history log through a temp file in the same directory,
    /// synced and atomically renamed over the original. A crash mid-rewrite
    /// leaves the original log intact.
    fn rewrite(&self, entries: &[HistoryEntry]) -> Result<()> {
        let dir = self
            .history_path
            .parent()
            .context("history path has no parent directory")?;
        let mut tmp = tempfile::Builder::new()
            .prefix("history-")
            .suffix(".jsonl")
            .tempfile_in(dir)
            .context("creating temp history file")?;
        for entry in entries {
            let data = serde_json::to_string(entry).context("marshalling history entry")?;
            writeln!(tmp, "{data}").context("writing to temp history file")?;
        }
        tmp.as_file()
            .sync_all()
            .context("syncing temp history file")?;
        tmp.persist(&self.history_path)
            .context("replacing history file")?;
        Ok(())
    }
}

fn append_record(path: &Path, entry: &HistoryEntry) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let data = serde_json::to_string(entry).context("marshalling entry")?;
    writeln!(file, "{data}").with_context(|| format!("writing to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry(prompt: &str, command: &str) -> HistoryEntry {
        HistoryEntry::new(prompt, command)
    }

    fn read_lines(path: &Path) -> Vec<HistoryEntry> {
        fs::read_to_string(path)
            .unwrap_or_default()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn load_is_recent_first_and_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::at(dir.path());

        for e in [
            entry("p1", "c1"),
            entry("p2", "c2"),
            entry("p1", "c1"),
            entry("p3", "c3"),
        ] {
            store.append(&e).unwrap();
        }

        let loaded = store.load();
        assert_eq!(
            loaded,
            vec![entry("p3", "c3"), entry("p1", "c1"), entry("p2", "c2")]
        );
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::at(dir.path());
        assert!(store.load().is_empty());
    }

    #[test]
    fn load_skips_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::at(dir.path());

        store.append(&entry("p1", "c1")).unwrap();
        let mut file = OpenOptions::new()
            .append(true)
            .open(dir.path().join("history.jsonl"))
            .unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(file, "{{\"prompt\": \"truncated").unwrap();
        drop(file);
        store.append(&entry("p2", "c2")).unwrap();

        assert_eq!(store.load(), vec![entry("p2", "c2"), entry("p1", "c1")]);
    }

    #[test]
    fn delete_removes_all_occurrences() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::at(dir.path());

        store.append(&entry("p1", "c1")).unwrap();
        store.append(&entry("p2", "c2")).unwrap();
        store.append(&entry("p1", "c1")).unwrap();

        store.delete(&entry("p1", "c1")).unwrap();

        assert_eq!(store.load(), vec![entry("p2", "c2")]);
        // The raw log should not contain the entry either.
        let raw = read_lines(&dir.path().join("history.jsonl"));
        assert_eq!(raw, vec![entry("p2", "c2")]);
    }

    #[test]
    fn delete_records_rejection_even_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::at(dir.path());

        store.append(&entry("p1", "c1")).unwrap();
        store.delete(&entry("never", "seen")).unwrap();

        assert_eq!(store.load(), vec![entry("p1", "c1")]);
        let rejected = read_lines(&dir.path().join("rejected.jsonl"));
        assert_eq!(rejected, vec![entry("never", "seen")]);
    }

    #[test]
    fn delete_from_empty_history_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::at(dir.path());

        store.delete(&entry("p1", "c1")).unwrap();

        assert!(store.load().is_empty());
        let rejected = read_lines(&dir.path().join("rejected.jsonl"));
        assert_eq!(rejected, vec![entry("p1", "c1")]);
    }

    #[test]
    fn repeated_deletes_accumulate_rejections() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::at(dir.path());

        store.append(&entry("p1", "c1")).unwrap();
        store.delete(&entry("p1", "c1")).unwrap();
        store.delete(&entry("p1", "c1")).unwrap();

        let rejected = read_lines(&dir.path().join("rejected.jsonl"));
        assert_eq!(rejected, vec![entry("p1", "c1"), entry("p1", "c1")]);
    }
}
