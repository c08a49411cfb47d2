//! The notebook store: sole owner of all notebook state.
//!
//! Every mutation is applied to a copy of the collection, written through the
//! `PersistenceService` and only then committed in memory, all while the state
//! lock is held. Mutations targeting an unknown notebook are silent no-ops.

use crate::domain::{
    new_id, Message, NewMessage, NewSource, Notebook, NotebookPatch, Source,
    DEFAULT_NOTEBOOK_EMOJI,
};
use crate::ports::{PersistenceService, PortResult};
use chrono::{DateTime, Utc};
use futures::lock::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Sort order for notebook listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotebookOrder {
    /// Most recently updated first.
    #[default]
    Recent,
    /// Alphabetical by title, case-insensitive.
    Title,
}

#[derive(Debug, Default)]
struct NotebookState {
    notebooks: Vec<Notebook>,
    current_notebook_id: Option<String>,
}

impl NotebookState {
    fn position(&self, notebook_id: &str) -> Option<usize> {
        self.notebooks.iter().position(|n| n.id == notebook_id)
    }
}

pub struct NotebookStore {
    persistence: Arc<dyn PersistenceService>,
    state: Mutex<NotebookState>,
}

impl NotebookStore {
    /// Rehydrates the store from persisted state. Unreadable state is logged and
    /// replaced by an empty collection.
    pub async fn load(persistence: Arc<dyn PersistenceService>) -> Self {
        let notebooks = match persistence.load_notebooks().await {
            Ok(notebooks) => notebooks,
            Err(e) => {
                error!("Failed to load notebooks, starting empty: {}", e);
                Vec::new()
            }
        };
        info!("Loaded {} notebooks from storage.", notebooks.len());
        Self {
            persistence,
            state: Mutex::new(NotebookState {
                notebooks,
                current_notebook_id: None,
            }),
        }
    }

    //=====================================================================================
    // Reads
    //=====================================================================================

    pub async fn notebooks(&self) -> Vec<Notebook> {
        self.state.lock().await.notebooks.clone()
    }

    pub async fn get_notebook(&self, notebook_id: &str) -> Option<Notebook> {
        let state = self.state.lock().await;
        state
            .position(notebook_id)
            .map(|index| state.notebooks[index].clone())
    }

    /// Notebooks whose title contains `query` (case-insensitive), in the requested order.
    pub async fn list(&self, query: &str, order: NotebookOrder) -> Vec<Notebook> {
        let needle = query.to_lowercase();
        let mut notebooks: Vec<Notebook> = self
            .state
            .lock()
            .await
            .notebooks
            .iter()
            .filter(|n| n.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        match order {
            NotebookOrder::Recent => notebooks.sort_by(|a, b| b.last_updated.cmp(&a.last_updated)),
            NotebookOrder::Title => {
                notebooks.sort_by_key(|n| n.title.to_lowercase());
            }
        }
        notebooks
    }

    pub async fn current_notebook(&self) -> Option<Notebook> {
        let state = self.state.lock().await;
        let id = state.current_notebook_id.as_deref()?;
        state.position(id).map(|index| state.notebooks[index].clone())
    }

    /// Selects (or clears) the current notebook. Selection is not persisted.
    pub async fn set_current_notebook(&self, notebook_id: Option<String>) {
        self.state.lock().await.current_notebook_id = notebook_id;
    }

    //=====================================================================================
    // Notebook mutations
    //=====================================================================================

    /// Creates an empty notebook, appends it and makes it the current selection.
    pub async fn create_notebook(&self, title: &str, emoji: Option<&str>) -> PortResult<Notebook> {
        let now = Utc::now();
        let notebook = Notebook {
            id: new_id(),
            title: title.to_string(),
            emoji: Some(
                emoji
                    .filter(|e| !e.is_empty())
                    .unwrap_or(DEFAULT_NOTEBOOK_EMOJI)
                    .to_string(),
            ),
            sources: Vec::new(),
            messages: Vec::new(),
            last_updated: now,
            created_at: now,
        };

        let mut state = self.state.lock().await;
        let mut next = state.notebooks.clone();
        next.push(notebook.clone());
        self.persistence.save_notebooks(&next).await?;
        state.notebooks = next;
        state.current_notebook_id = Some(notebook.id.clone());

        info!("Created notebook {} ('{}').", notebook.id, notebook.title);
        Ok(notebook)
    }

    /// Removes a notebook. Returns `false` when no notebook had that id.
    pub async fn delete_notebook(&self, notebook_id: &str) -> PortResult<bool> {
        let mut state = self.state.lock().await;
        let Some(index) = state.position(notebook_id) else {
            debug!("delete_notebook: notebook {} not found", notebook_id);
            return Ok(false);
        };

        let mut next = state.notebooks.clone();
        next.remove(index);
        self.persistence.save_notebooks(&next).await?;
        state.notebooks = next;
        if state.current_notebook_id.as_deref() == Some(notebook_id) {
            state.current_notebook_id = None;
        }

        info!("Deleted notebook {}.", notebook_id);
        Ok(true)
    }

    pub async fn update_notebook(
        &self,
        notebook_id: &str,
        patch: NotebookPatch,
    ) -> PortResult<Option<Notebook>> {
        self.modify(notebook_id, move |notebook, now| {
            if let Some(title) = patch.title {
                notebook.title = title;
            }
            if let Some(emoji) = patch.emoji {
                notebook.emoji = Some(emoji);
            }
            notebook.last_updated = now;
            Some(notebook.clone())
        })
        .await
    }

    //=====================================================================================
    // Source mutations
    //=====================================================================================

    /// Appends a source with a store-generated id and `date_added`.
    pub async fn add_source(
        &self,
        notebook_id: &str,
        fields: NewSource,
    ) -> PortResult<Option<Source>> {
        self.modify(notebook_id, move |notebook, now| {
            let source = Source {
                id: new_id(),
                kind: fields.kind,
                title: fields.title,
                content: fields.content,
                url: fields.url,
                date_added: now,
            };
            notebook.sources.push(source.clone());
            Some(source)
        })
        .await
    }

    /// Removes a source. Citations pointing at it are left untouched.
    pub async fn remove_source(&self, notebook_id: &str, source_id: &str) -> PortResult<bool> {
        let removed = self
            .modify(notebook_id, |notebook, _| {
                let index = notebook.sources.iter().position(|s| s.id == source_id)?;
                notebook.sources.remove(index);
                Some(())
            })
            .await?;
        Ok(removed.is_some())
    }

    //=====================================================================================
    // Message mutations
    //=====================================================================================

    pub async fn add_message(
        &self,
        notebook_id: &str,
        fields: NewMessage,
    ) -> PortResult<Option<Message>> {
        self.modify(notebook_id, move |notebook, now| {
            let message = Message {
                id: new_id(),
                role: fields.role,
                content: fields.content,
                timestamp: now,
                citations: fields.citations,
            };
            notebook.messages.push(message.clone());
            Some(message)
        })
        .await
    }

    /// Empties the message list, leaving sources untouched.
    pub async fn clear_messages(&self, notebook_id: &str) -> PortResult<bool> {
        let cleared = self
            .modify(notebook_id, |notebook, _| {
                notebook.messages.clear();
                Some(())
            })
            .await?;
        Ok(cleared.is_some())
    }

    /// Applies `apply` to a copy of the target notebook, bumps `last_updated`,
    /// persists and commits. `apply` returning `None` means nothing changed.
    async fn modify<T, F>(&self, notebook_id: &str, apply: F) -> PortResult<Option<T>>
    where
        F: FnOnce(&mut Notebook, DateTime<Utc>) -> Option<T> + Send,
        T: Send,
    {
        let mut state = self.state.lock().await;
        let Some(index) = state.position(notebook_id) else {
            debug!("notebook {} not found, mutation skipped", notebook_id);
            return Ok(None);
        };

        let now = Utc::now();
        let mut next = state.notebooks.clone();
        let Some(output) = apply(&mut next[index], now) else {
            return Ok(None);
        };
        next[index].last_updated = now;

        self.persistence.save_notebooks(&next).await?;
        state.notebooks = next;
        Ok(Some(output))
    }
}
