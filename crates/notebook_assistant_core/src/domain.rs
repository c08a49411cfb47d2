//! crates/notebook_assistant_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any storage or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Emoji given to notebooks created without one.
pub const DEFAULT_NOTEBOOK_EMOJI: &str = "📓";

/// Generates a collision-resistant identifier for notebooks, sources, messages and citations.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A user-created container grouping sources and a chat history.
#[derive(Debug, Clone, PartialEq)]
pub struct Notebook {
    pub id: String,
    pub title: String,
    pub emoji: Option<String>,
    pub sources: Vec<Source>,
    pub messages: Vec<Message>,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Notebook {
    /// Looks up one of the notebook's sources by id.
    pub fn source(&self, source_id: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.id == source_id)
    }
}

/// The closed set of source types a notebook accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Pdf,
    Website,
    Youtube,
    Text,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Pdf => "pdf",
            SourceKind::Website => "website",
            SourceKind::Youtube => "youtube",
            SourceKind::Text => "text",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(SourceKind::Pdf),
            "website" => Ok(SourceKind::Website),
            "youtube" => Ok(SourceKind::Youtube),
            "text" => Ok(SourceKind::Text),
            other => Err(format!("unknown source type '{}'", other)),
        }
    }
}

/// A reference document or media item attached to a notebook.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub id: String,
    pub kind: SourceKind,
    pub title: String,
    pub content: Option<String>,
    pub url: Option<String>,
    pub date_added: DateTime<Utc>,
}

impl Source {
    /// The payload that represents this source in a prompt.
    ///
    /// Text sources carry their content, every other kind carries a url. The
    /// model does not enforce exclusivity, so the other field is used as a fallback.
    pub fn reference(&self) -> &str {
        let (primary, secondary) = match self.kind {
            SourceKind::Text => (&self.content, &self.url),
            _ => (&self.url, &self.content),
        };
        primary
            .as_deref()
            .or(secondary.as_deref())
            .unwrap_or_default()
    }
}

/// The caller-supplied part of a source. Ids and timestamps are always store-generated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSource {
    pub kind: SourceKind,
    pub title: String,
    pub content: Option<String>,
    pub url: Option<String>,
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(format!("unknown message role '{}'", other)),
        }
    }
}

/// One turn in a chat history.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub citations: Vec<Citation>,
}

/// The caller-supplied part of a message.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub role: Role,
    pub content: String,
    pub citations: Vec<Citation>,
}

impl NewMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            citations: Vec::new(),
        }
    }

    pub fn assistant(content: impl Into<String>, citations: Vec<Citation>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            citations,
        }
    }
}

/// A back-reference from a marker in an assistant message to a source.
///
/// `source_id` is a weak reference: it is only valid at creation time and may
/// dangle once the source is removed from its notebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub id: String,
    pub source_id: String,
    /// The literal marker, e.g. `[1]`, as it appears in the message content.
    pub text: String,
}

/// Fields of a notebook that can be changed after creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotebookPatch {
    pub title: Option<String>,
    pub emoji: Option<String>,
}

/// The user's colour scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

// Suggestion cards shown in the notebook studio. They describe an action but nothing executes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Automation {
    pub id: String,
    pub notebook_id: String,
    pub title: String,
    pub description: String,
    pub category: AutomationCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomationCategory {
    Summary,
    Analysis,
    Visualization,
    Organization,
    Reminder,
}

impl AutomationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AutomationCategory::Summary => "summary",
            AutomationCategory::Analysis => "analysis",
            AutomationCategory::Visualization => "visualization",
            AutomationCategory::Organization => "organization",
            AutomationCategory::Reminder => "reminder",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(kind: SourceKind, content: Option<&str>, url: Option<&str>) -> Source {
        Source {
            id: new_id(),
            kind,
            title: "t".to_string(),
            content: content.map(str::to_string),
            url: url.map(str::to_string),
            date_added: Utc::now(),
        }
    }

    #[test]
    fn text_sources_reference_their_content() {
        let s = source(SourceKind::Text, Some("body"), Some("https://x"));
        assert_eq!(s.reference(), "body");
    }

    #[test]
    fn link_sources_reference_their_url_and_fall_back_to_content() {
        let s = source(SourceKind::Website, Some("body"), Some("https://x"));
        assert_eq!(s.reference(), "https://x");

        let s = source(SourceKind::Youtube, Some("transcript"), None);
        assert_eq!(s.reference(), "transcript");

        let s = source(SourceKind::Pdf, None, None);
        assert_eq!(s.reference(), "");
    }

    #[test]
    fn source_kind_parses_its_own_names() {
        for kind in [
            SourceKind::Pdf,
            SourceKind::Website,
            SourceKind::Youtube,
            SourceKind::Text,
        ] {
            assert_eq!(kind.as_str().parse::<SourceKind>(), Ok(kind));
        }
        assert!("podcast".parse::<SourceKind>().is_err());
    }

    #[test]
    fn theme_defaults_to_dark_and_toggles() {
        assert_eq!(Theme::default(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }

    #[test]
    fn generated_ids_are_unique() {
        let ids: std::collections::HashSet<String> = (0..1000).map(|_| new_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
