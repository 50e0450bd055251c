//! Deterministic in-memory controller.
//!
//! Backs the `demo` subcommand (no API key or network needed) and the UI
//! tests. History mutations behave like the real store, minus the disk.

use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;

use super::{Controller, HistoryEntry};

pub struct FakeController {
    state: Mutex<FakeState>,
    commands: Vec<String>,
    generate_delay: Duration,
    generate_error: Option<String>,
    delete_error: Option<String>,
}

struct FakeState {
    history: Vec<HistoryEntry>,
    rejected: Vec<HistoryEntry>,
}

impl FakeController {
    /// Demo dataset: a plausible history and a few candidate commands, with
    /// a delay long enough to see the wait spinner.
    pub fn new() -> Self {
        let history = vec![
            HistoryEntry::new("list files", "ls -l"),
            HistoryEntry::new("find all subdirectories", "find . -type d"),
            HistoryEntry::new("return the second column of a csv", "awk -F, '{print $2}'"),
            HistoryEntry::new("show disk usage per directory", "du -sh */"),
            HistoryEntry::new("count lines in all rust files", "find . -name '*.rs' | xargs wc -l"),
            HistoryEntry::new("kill all processes of a user", "pkill -u <username>"),
            HistoryEntry::new(
                "delete all .bak files in subdirectories",
                "find . -name '*.bak' -delete",
            ),
            HistoryEntry::new("follow the system log", "journalctl -f"),
        ];
        let commands = vec![
            "find . -name *.jpg".to_string(),
            "find . -type f -name *.jpg".to_string(),
            "find ./ -name \"*.jpg\"".to_string(),
            "find . -iname *.jpg".to_string(),
        ];
        Self::with(history, commands).delay(Duration::from_secs(2))
    }

    /// Controller with explicit history and candidates and no delay.
    pub fn with(history: Vec<HistoryEntry>, commands: Vec<String>) -> Self {
        Self {
            state: Mutex::new(FakeState {
                history,
                rejected: Vec::new(),
            }),
            commands,
            generate_delay: Duration::ZERO,
            generate_error: None,
            delete_error: None,
        }
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.generate_delay = delay;
        self
    }

    pub fn failing_generate(mut self, message: &str) -> Self {
        self.generate_error = Some(message.to_string());
        self
    }

    pub fn failing_delete(mut self, message: &str) -> Self {
        self.delete_error = Some(message.to_string());
        self
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.lock_state().history.clone()
    }

    pub fn rejected(&self) -> Vec<HistoryEntry> {
        self.lock_state().rejected.clone()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for FakeController {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Controller for FakeController {
    fn load_history(&self) -> Vec<HistoryEntry> {
        self.history()
    }

    fn append_history(&self, entry: &HistoryEntry) -> Result<()> {
        self.lock_state().history.push(entry.clone());
        Ok(())
    }

    fn delete_history(&self, entry: &HistoryEntry) -> Result<()> {
        let mut state = self.lock_state();
        state.rejected.push(entry.clone());
        if let Some(message) = &self.delete_error {
            bail!("{message}");
        }
        state.history.retain(|e| e != entry);
        Ok(())
    }

    async fn generate(&self, _prompt: &str) -> Result<Vec<String>> {
        if !self.generate_delay.is_zero() {
            tokio::time::sleep(self.generate_delay).await;
        }
        if let Some(message) = &self.generate_error {
            bail!("{message}");
        }
        Ok(self.commands.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn generate_returns_canned_commands() {
        let fake = FakeController::with(Vec::new(), vec!["ls".to_string()]);
        assert_eq!(fake.generate("anything").await.unwrap(), vec!["ls"]);
    }

    #[tokio::test]
    async fn generate_can_fail() {
        let fake = FakeController::with(Vec::new(), Vec::new()).failing_generate("boom");
        assert!(fake.generate("anything").await.is_err());
    }

    #[test]
    fn delete_records_rejection_and_removes_entry() {
        let entry = HistoryEntry::new("p", "c");
        let fake = FakeController::with(vec![entry.clone(), entry.clone()], Vec::new());

        fake.delete_history(&entry).unwrap();

        assert!(fake.history().is_empty());
        assert_eq!(fake.rejected(), vec![entry]);
    }

    #[test]
    fn failed_delete_still_records_rejection() {
        let entry = HistoryEntry::new("p", "c");
        let fake = FakeController::with(vec![entry.clone()], Vec::new()).failing_delete("nope");

        assert!(fake.delete_history(&entry).is_err());
        assert_eq!(fake.rejected(), vec![entry.clone()]);
        assert_eq!(fake.history(), vec![entry]);
    }
}
