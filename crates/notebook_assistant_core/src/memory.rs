//! In-process implementation of the `PersistenceService` port.
//!
//! Used by tests and by deployments that do not need state to survive a restart.

use crate::domain::{Message, Notebook, Theme};
use crate::ports::{PersistenceService, PortError, PortResult};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Entries {
    notebooks: Option<Vec<Notebook>>,
    chat_messages: Option<Vec<Message>>,
    theme: Option<Theme>,
    saves: usize,
}

#[derive(Debug, Default)]
pub struct MemoryPersistence {
    entries: Mutex<Entries>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the notebook entry, as if it had been written by an earlier run.
    pub fn with_notebooks(notebooks: Vec<Notebook>) -> Self {
        let persistence = Self::default();
        if let Ok(mut entries) = persistence.entries.lock() {
            entries.notebooks = Some(notebooks);
        }
        persistence
    }

    /// Number of save calls received across all entries.
    pub fn save_count(&self) -> usize {
        self.entries.lock().map(|e| e.saves).unwrap_or_default()
    }

    fn lock(&self) -> PortResult<MutexGuard<'_, Entries>> {
        self.entries
            .lock()
            .map_err(|e| PortError::Unexpected(format!("memory store poisoned: {}", e)))
    }
}

#[async_trait]
impl PersistenceService for MemoryPersistence {
    async fn load_notebooks(&self) -> PortResult<Vec<Notebook>> {
        Ok(self.lock()?.notebooks.clone().unwrap_or_default())
    }

    async fn save_notebooks(&self, notebooks: &[Notebook]) -> PortResult<()> {
        let mut entries = self.lock()?;
        entries.notebooks = Some(notebooks.to_vec());
        entries.saves += 1;
        Ok(())
    }

    async fn load_chat_messages(&self) -> PortResult<Vec<Message>> {
        Ok(self.lock()?.chat_messages.clone().unwrap_or_default())
    }

    async fn save_chat_messages(&self, messages: &[Message]) -> PortResult<()> {
        let mut entries = self.lock()?;
        entries.chat_messages = Some(messages.to_vec());
        entries.saves += 1;
        Ok(())
    }

    async fn load_theme(&self) -> PortResult<Theme> {
        Ok(self.lock()?.theme.unwrap_or_default())
    }

    async fn save_theme(&self, theme: Theme) -> PortResult<()> {
        let mut entries = self.lock()?;
        entries.theme = Some(theme);
        entries.saves += 1;
        Ok(())
    }
}
