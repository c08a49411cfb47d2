pub mod automations;
pub mod citations;
pub mod conversation;
pub mod domain;
pub mod format;
pub mod generator;
pub mod memory;
pub mod ports;
pub mod store;

pub use domain::{
    Automation, AutomationCategory, Citation, Message, NewMessage, NewSource, Notebook,
    NotebookPatch, Role, Source, SourceKind, Theme,
};
pub use generator::{GeneratedResponse, ResponseGenerator};
pub use memory::MemoryPersistence;
pub use ports::{
    CompletionMessage, CompletionRole, CompletionService, PersistenceService, PortError,
    PortResult,
};
pub use store::{ChatStore, NotebookOrder, NotebookStore, ThemeStore};
