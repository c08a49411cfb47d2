//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use notebook_assistant_core::ports::{CompletionService, PersistenceService};
use notebook_assistant_core::{ChatStore, NotebookStore, ResponseGenerator, ThemeStore};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub notebooks: Arc<NotebookStore>,
    pub chat: Arc<ChatStore>,
    pub theme: Arc<ThemeStore>,
    pub generator: ResponseGenerator,
}

impl AppState {
    /// Rehydrates every store from `persistence` and wires the generator to `completion`.
    /// Entries that cannot be read start out empty, so startup never fails on stored data.
    pub async fn new(
        persistence: Arc<dyn PersistenceService>,
        completion: Arc<dyn CompletionService>,
    ) -> Self {
        Self {
            notebooks: Arc::new(NotebookStore::load(persistence.clone()).await),
            chat: Arc::new(ChatStore::load(persistence.clone()).await),
            theme: Arc::new(ThemeStore::load(persistence).await),
            generator: ResponseGenerator::new(completion),
        }
    }
}
