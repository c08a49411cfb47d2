//! crates/notebook_assistant_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like storage or LLM APIs.

use crate::domain::{Message, Notebook, Theme};
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., filesystem, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Completion service returned {status}: {message}")]
    Completion { status: u16, message: String },
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable key-value storage for the three persisted entries.
///
/// Every save is a whole-value overwrite. Loading an entry that was never
/// saved yields its empty or default value.
#[async_trait]
pub trait PersistenceService: Send + Sync {
    async fn load_notebooks(&self) -> PortResult<Vec<Notebook>>;

    async fn save_notebooks(&self, notebooks: &[Notebook]) -> PortResult<()>;

    async fn load_chat_messages(&self) -> PortResult<Vec<Message>>;

    async fn save_chat_messages(&self, messages: &[Message]) -> PortResult<()>;

    async fn load_theme(&self) -> PortResult<Theme>;

    async fn save_theme(&self, theme: Theme) -> PortResult<()>;
}

/// Speaker of one entry in a completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionRole {
    System,
    User,
}

impl CompletionRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionRole::System => "system",
            CompletionRole::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionMessage {
    pub role: CompletionRole,
    pub content: String,
}

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends the exchange to the text-completion backend and returns the completion text.
    ///
    /// A single attempt is made. Any transport failure, non-success status or
    /// unreadable body is an error.
    async fn complete(&self, messages: &[CompletionMessage]) -> PortResult<String>;
}
