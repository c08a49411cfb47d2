//! services/api/src/adapters/file_store.rs
//!
//! This module contains the persistence adapter, the concrete implementation of
//! the `PersistenceService` port from the `core` crate. Each persisted entry is a
//! single JSON document in the data directory, overwritten whole on every save.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use notebook_assistant_core::domain::{Citation, Message, Notebook, Source, Theme};
use notebook_assistant_core::ports::{PersistenceService, PortError, PortResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

const NOTEBOOKS_FILE: &str = "notebook-storage.json";
const CHAT_FILE: &str = "chat-storage.json";
const THEME_FILE: &str = "theme-storage.json";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A persistence adapter that implements the `PersistenceService` port on top of JSON files.
#[derive(Clone, Debug)]
pub struct JsonFileAdapter {
    dir: PathBuf,
}

impl JsonFileAdapter {
    /// Creates a new `JsonFileAdapter`, creating the data directory if needed.
    pub async fn new(dir: impl Into<PathBuf>) -> PortResult<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| PortError::Unexpected(format!("cannot create {}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    /// Reads and decodes one entry. A document that fails to decode is moved
    /// aside to `<file>.corrupt` before the error is returned, so the next save
    /// does not overwrite it.
    async fn read<T, R>(
        &self,
        file: &str,
        decode: impl FnOnce(T) -> PortResult<R>,
    ) -> PortResult<Option<R>>
    where
        T: DeserializeOwned,
    {
        let path = self.dir.join(file);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&path, e)),
        };
        let decoded = serde_json::from_slice(&bytes)
            .map_err(|e| PortError::Unexpected(format!("corrupt {}: {}", path.display(), e)))
            .and_then(decode);
        match decoded {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                self.set_aside(&path).await;
                Err(e)
            }
        }
    }

    async fn set_aside(&self, path: &Path) {
        let aside = path.with_extension("json.corrupt");
        match tokio::fs::rename(path, &aside).await {
            Ok(()) => error!("Moved unreadable {} to {}.", path.display(), aside.display()),
            Err(e) => error!("Could not move unreadable {} aside: {}", path.display(), e),
        }
    }

    /// Writes to a sibling temp file and renames it over the target, so a crash
    /// leaves either the old or the new document.
    async fn write<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> PortResult<()> {
        let path = self.dir.join(file);
        let tmp = self.dir.join(format!("{}.tmp", file));
        let json = serde_json::to_vec_pretty(value)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| io_error(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_error(&path, e))?;
        debug!("Wrote {}.", path.display());
        Ok(())
    }
}

fn io_error(path: &Path, e: std::io::Error) -> PortError {
    PortError::Unexpected(format!("{}: {}", path.display(), e))
}

fn parse_field<T>(value: &str) -> PortResult<T>
where
    T: std::str::FromStr<Err = String>,
{
    value.parse().map_err(PortError::Unexpected)
}

//=========================================================================================
// Stored Record Structs
//=========================================================================================

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotebookRecord {
    id: String,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    emoji: Option<String>,
    #[serde(default)]
    sources: Vec<SourceRecord>,
    #[serde(default)]
    messages: Vec<MessageRecord>,
    last_updated: DateTime<Utc>,
    created_at: DateTime<Utc>,
}
impl NotebookRecord {
    fn from_domain(notebook: &Notebook) -> Self {
        Self {
            id: notebook.id.clone(),
            title: notebook.title.clone(),
            emoji: notebook.emoji.clone(),
            sources: notebook.sources.iter().map(SourceRecord::from_domain).collect(),
            messages: notebook.messages.iter().map(MessageRecord::from_domain).collect(),
            last_updated: notebook.last_updated,
            created_at: notebook.created_at,
        }
    }

    fn to_domain(self) -> PortResult<Notebook> {
        Ok(Notebook {
            id: self.id,
            title: self.title,
            emoji: self.emoji,
            sources: self
                .sources
                .into_iter()
                .map(SourceRecord::to_domain)
                .collect::<PortResult<_>>()?,
            messages: self
                .messages
                .into_iter()
                .map(MessageRecord::to_domain)
                .collect::<PortResult<_>>()?,
            last_updated: self.last_updated,
            created_at: self.created_at,
        })
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SourceRecord {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    date_added: DateTime<Utc>,
}
impl SourceRecord {
    fn from_domain(source: &Source) -> Self {
        Self {
            id: source.id.clone(),
            kind: source.kind.as_str().to_string(),
            title: source.title.clone(),
            content: source.content.clone(),
            url: source.url.clone(),
            date_added: source.date_added,
        }
    }

    fn to_domain(self) -> PortResult<Source> {
        Ok(Source {
            id: self.id,
            kind: parse_field(&self.kind)?,
            title: self.title,
            content: self.content,
            url: self.url,
            date_added: self.date_added,
        })
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageRecord {
    id: String,
    role: String,
    content: String,
    timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    citations: Vec<CitationRecord>,
}
impl MessageRecord {
    fn from_domain(message: &Message) -> Self {
        Self {
            id: message.id.clone(),
            role: message.role.as_str().to_string(),
            content: message.content.clone(),
            timestamp: message.timestamp,
            citations: message.citations.iter().map(CitationRecord::from_domain).collect(),
        }
    }

    fn to_domain(self) -> PortResult<Message> {
        Ok(Message {
            id: self.id,
            role: parse_field(&self.role)?,
            content: self.content,
            timestamp: self.timestamp,
            citations: self.citations.into_iter().map(CitationRecord::to_domain).collect(),
        })
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CitationRecord {
    id: String,
    source_id: String,
    text: String,
}
impl CitationRecord {
    fn from_domain(citation: &Citation) -> Self {
        Self {
            id: citation.id.clone(),
            source_id: citation.source_id.clone(),
            text: citation.text.clone(),
        }
    }

    fn to_domain(self) -> Citation {
        Citation {
            id: self.id,
            source_id: self.source_id,
            text: self.text,
        }
    }
}

//=========================================================================================
// `PersistenceService` Trait Implementation
//=========================================================================================

#[async_trait]
impl PersistenceService for JsonFileAdapter {
    async fn load_notebooks(&self) -> PortResult<Vec<Notebook>> {
        self.read(NOTEBOOKS_FILE, |records: Vec<NotebookRecord>| {
            records.into_iter().map(NotebookRecord::to_domain).collect()
        })
        .await
        .map(Option::unwrap_or_default)
    }

    async fn save_notebooks(&self, notebooks: &[Notebook]) -> PortResult<()> {
        let records: Vec<NotebookRecord> = notebooks.iter().map(NotebookRecord::from_domain).collect();
        self.write(NOTEBOOKS_FILE, &records).await
    }

    async fn load_chat_messages(&self) -> PortResult<Vec<Message>> {
        self.read(CHAT_FILE, |records: Vec<MessageRecord>| {
            records.into_iter().map(MessageRecord::to_domain).collect()
        })
        .await
        .map(Option::unwrap_or_default)
    }

    async fn save_chat_messages(&self, messages: &[Message]) -> PortResult<()> {
        let records: Vec<MessageRecord> = messages.iter().map(MessageRecord::from_domain).collect();
        self.write(CHAT_FILE, &records).await
    }

    async fn load_theme(&self) -> PortResult<Theme> {
        self.read(THEME_FILE, |theme: String| parse_field(&theme))
            .await
            .map(Option::unwrap_or_default)
    }

    async fn save_theme(&self, theme: Theme) -> PortResult<()> {
        self.write(THEME_FILE, theme.as_str()).await
    }
}
