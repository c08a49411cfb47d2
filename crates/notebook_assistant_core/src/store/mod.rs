//! Client-side state containers. Each one owns its slice of state and writes
//! it through the injected `PersistenceService` on every mutation.

pub mod chat;
pub mod notebooks;
pub mod theme;

pub use chat::ChatStore;
pub use notebooks::{NotebookOrder, NotebookStore};
pub use theme::ThemeStore;
