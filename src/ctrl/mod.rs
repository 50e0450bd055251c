//! Controller boundary between the interactive session and the outside
//! world: the history store and the language-model gateway.
//!
//! The session depends only on the [`Controller`] trait, so tests and the
//! demo mode can swap in [`FakeController`] without touching the UI.

pub mod fake;
pub mod model;
pub mod store;

use anyhow::Result;
use async_trait::async_trait;

pub use fake::FakeController;
pub use store::{HistoryEntry, HistoryStore};

use crate::config::Config;
use model::OpenAiModel;

/// Everything the interactive session needs from the outside world.
#[async_trait]
pub trait Controller: Send + Sync {
    /// Loaded history, most recent first, deduplicated. Never fails; an
    /// unreadable store reads as empty.
    fn load_history(&self) -> Vec<HistoryEntry>;

    fn append_history(&self, entry: &HistoryEntry) -> Result<()>;

    fn delete_history(&self, entry: &HistoryEntry) -> Result<()>;

    /// Turn a natural-language prompt into an ordered list of candidate
    /// commands. An empty list is a valid (if unhelpful) result, distinct
    /// from an error.
    async fn generate(&self, prompt: &str) -> Result<Vec<String>>;
}

/// The production controller: on-disk history plus the configured model.
pub struct AppController {
    store: HistoryStore,
    model: OpenAiModel,
}

impl AppController {
    pub fn new(cfg: &Config) -> Result<Self> {
        Ok(Self {
            store: HistoryStore::open_default()?,
            model: OpenAiModel::new(&cfg.llm)?,
        })
    }
}

#[async_trait]
impl Controller for AppController {
    fn load_history(&self) -> Vec<HistoryEntry> {
        self.store.load()
    }

    fn append_history(&self, entry: &HistoryEntry) -> Result<()> {
        self.store.append(entry)
    }

    fn delete_history(&self, entry: &HistoryEntry) -> Result<()> {
        self.store.delete(entry)
    }

    async fn generate(&self, prompt: &str) -> Result<Vec<String>> {
        self.model.generate_commands(prompt).await
    }
}
