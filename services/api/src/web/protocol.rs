//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the client and the API server.
//! Field names are camelCase to match what the mobile client already stores.

use chrono::{DateTime, Utc};
use notebook_assistant_core::citations::{split_content, Segment};
use notebook_assistant_core::format::relative_time;
use notebook_assistant_core::{
    Automation, Citation, Message, NewSource, Notebook, NotebookOrder, NotebookPatch, Role,
    Source, SourceKind, Theme,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

//=========================================================================================
// Shared Enums
//=========================================================================================

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Pdf,
    Website,
    Youtube,
    Text,
}

impl From<SourceType> for SourceKind {
    fn from(value: SourceType) -> Self {
        match value {
            SourceType::Pdf => SourceKind::Pdf,
            SourceType::Website => SourceKind::Website,
            SourceType::Youtube => SourceKind::Youtube,
            SourceType::Text => SourceKind::Text,
        }
    }
}

impl From<SourceKind> for SourceType {
    fn from(value: SourceKind) -> Self {
        match value {
            SourceKind::Pdf => SourceType::Pdf,
            SourceKind::Website => SourceType::Website,
            SourceKind::Youtube => SourceType::Youtube,
            SourceKind::Text => SourceType::Text,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl From<Role> for MessageRole {
    fn from(value: Role) -> Self {
        match value {
            Role::User => MessageRole::User,
            Role::Assistant => MessageRole::Assistant,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    Light,
    Dark,
}

impl From<ThemeName> for Theme {
    fn from(value: ThemeName) -> Self {
        match value {
            ThemeName::Light => Theme::Light,
            ThemeName::Dark => Theme::Dark,
        }
    }
}

impl From<Theme> for ThemeName {
    fn from(value: Theme) -> Self {
        match value {
            Theme::Light => ThemeName::Light,
            Theme::Dark => ThemeName::Dark,
        }
    }
}

#[derive(Deserialize, ToSchema, Debug, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListOrder {
    #[default]
    Recent,
    Title,
}

impl From<ListOrder> for NotebookOrder {
    fn from(value: ListOrder) -> Self {
        match value {
            ListOrder::Recent => NotebookOrder::Recent,
            ListOrder::Title => NotebookOrder::Title,
        }
    }
}

//=========================================================================================
// Payloads Sent FROM the Client TO the Server
//=========================================================================================

/// Filters for the notebook listing.
#[derive(Deserialize, IntoParams, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct ListNotebooksQuery {
    /// Case-insensitive title substring.
    pub q: Option<String>,
    pub order: Option<ListOrder>,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct CreateNotebookRequest {
    pub title: String,
    pub emoji: Option<String>,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct UpdateNotebookRequest {
    pub title: Option<String>,
    pub emoji: Option<String>,
}

impl From<UpdateNotebookRequest> for NotebookPatch {
    fn from(value: UpdateNotebookRequest) -> Self {
        NotebookPatch {
            title: value.title,
            emoji: value.emoji,
        }
    }
}

#[derive(Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SelectNotebookRequest {
    /// `null` clears the selection.
    pub notebook_id: Option<String>,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct AddSourceRequest {
    #[serde(rename = "type")]
    pub kind: SourceType,
    pub title: String,
    pub content: Option<String>,
    pub url: Option<String>,
}

impl From<AddSourceRequest> for NewSource {
    fn from(value: AddSourceRequest) -> Self {
        NewSource {
            kind: value.kind.into(),
            title: value.title,
            content: value.content,
            url: value.url,
        }
    }
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct AskRequest {
    pub prompt: String,
}

#[derive(Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatAskRequest {
    pub prompt: String,
    /// Notebooks whose sources are cited. Empty means all notebooks.
    #[serde(default)]
    pub notebook_ids: Vec<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ThemePayload {
    pub theme: ThemeName,
}

//=========================================================================================
// Payloads Sent FROM the Server TO the Client
//=========================================================================================

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NotebookResponse {
    pub id: String,
    pub title: String,
    pub emoji: Option<String>,
    pub sources: Vec<SourceResponse>,
    pub messages: Vec<MessageResponse>,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    /// `lastUpdated` relative to the time of the response, e.g. "5 mins ago".
    pub last_updated_label: String,
}

impl NotebookResponse {
    pub fn new(notebook: Notebook, now: DateTime<Utc>) -> Self {
        Self {
            last_updated_label: relative_time(notebook.last_updated, now),
            id: notebook.id,
            title: notebook.title,
            emoji: notebook.emoji,
            sources: notebook.sources.into_iter().map(SourceResponse::from).collect(),
            messages: notebook.messages.into_iter().map(MessageResponse::from).collect(),
            last_updated: notebook.last_updated,
            created_at: notebook.created_at,
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SourceResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SourceType,
    pub title: String,
    pub content: Option<String>,
    pub url: Option<String>,
    pub date_added: DateTime<Utc>,
}

impl From<Source> for SourceResponse {
    fn from(source: Source) -> Self {
        Self {
            id: source.id,
            kind: source.kind.into(),
            title: source.title,
            content: source.content,
            url: source.url,
            date_added: source.date_added,
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CitationResponse {
    pub id: String,
    pub source_id: String,
    pub text: String,
}

impl From<Citation> for CitationResponse {
    fn from(citation: Citation) -> Self {
        Self {
            id: citation.id,
            source_id: citation.source_id,
            text: citation.text,
        }
    }
}

/// A span of message content, ready to be rendered.
#[derive(Serialize, ToSchema, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SegmentResponse {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Citation {
        citation_id: String,
        source_id: String,
        text: String,
    },
}

impl From<Segment> for SegmentResponse {
    fn from(segment: Segment) -> Self {
        match segment {
            Segment::Text(text) => SegmentResponse::Text { text },
            Segment::Citation {
                citation_id,
                source_id,
                text,
            } => SegmentResponse::Citation {
                citation_id,
                source_id,
                text,
            },
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub citations: Vec<CitationResponse>,
    pub segments: Vec<SegmentResponse>,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        let segments = split_content(&message.content, &message.citations)
            .into_iter()
            .map(SegmentResponse::from)
            .collect();
        Self {
            id: message.id,
            role: message.role.into(),
            content: message.content,
            timestamp: message.timestamp,
            citations: message.citations.into_iter().map(CitationResponse::from).collect(),
            segments,
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AutomationResponse {
    pub id: String,
    pub notebook_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
}

impl From<Automation> for AutomationResponse {
    fn from(automation: Automation) -> Self {
        Self {
            id: automation.id,
            notebook_id: automation.notebook_id,
            title: automation.title,
            description: automation.description,
            category: automation.category.as_str().to_string(),
        }
    }
}
