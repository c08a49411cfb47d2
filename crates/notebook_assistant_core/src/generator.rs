//! crates/notebook_assistant_core/src/generator.rs
//!
//! Turns a prompt and an ordered list of sources into completion text plus
//! the citations found in it.

use crate::citations::{build_messages, extract_citations};
use crate::domain::{Citation, Source};
use crate::ports::{CompletionService, PortResult};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedResponse {
    pub text: String,
    pub citations: Vec<Citation>,
}

#[derive(Clone)]
pub struct ResponseGenerator {
    completion: Arc<dyn CompletionService>,
}

impl ResponseGenerator {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self { completion }
    }

    /// Makes one completion call. Source order defines what `[n]` refers to.
    ///
    /// Fails as a whole if the call fails; no partial text or citations are returned.
    pub async fn generate(&self, prompt: &str, sources: &[Source]) -> PortResult<GeneratedResponse> {
        let messages = build_messages(prompt, sources);
        let text = self.completion.complete(&messages).await?;
        let citations = extract_citations(&text, sources);
        debug!(
            "Completion returned {} chars with {} citations over {} sources.",
            text.len(),
            citations.len(),
            sources.len()
        );
        Ok(GeneratedResponse { text, citations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceKind;
    use crate::ports::{CompletionMessage, PortError};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    struct Recording {
        reply: PortResult<String>,
        seen: Mutex<Vec<Vec<CompletionMessage>>>,
    }

    #[async_trait]
    impl CompletionService for Recording {
        async fn complete(&self, messages: &[CompletionMessage]) -> PortResult<String> {
            self.seen.lock().unwrap().push(messages.to_vec());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(PortError::Unexpected(e.to_string())),
            }
        }
    }

    fn sources() -> Vec<Source> {
        ["s1", "s2"]
            .into_iter()
            .map(|id| Source {
                id: id.to_string(),
                kind: SourceKind::Website,
                title: format!("title {}", id),
                content: None,
                url: Some(format!("https://example.com/{}", id)),
                date_added: Utc::now(),
            })
            .collect()
    }

    #[tokio::test]
    async fn generate_returns_text_unchanged_with_citations() {
        let completion = Arc::new(Recording {
            reply: Ok("Point one [1]. Point two [2].".to_string()),
            seen: Mutex::new(Vec::new()),
        });
        let generator = ResponseGenerator::new(completion.clone());

        let response = generator.generate("Summarize", &sources()).await.unwrap();

        assert_eq!(response.text, "Point one [1]. Point two [2].");
        let pairs: Vec<(&str, &str)> = response
            .citations
            .iter()
            .map(|c| (c.source_id.as_str(), c.text.as_str()))
            .collect();
        assert_eq!(pairs, [("s1", "[1]"), ("s2", "[2]")]);

        let seen = completion.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0][1].content, "Summarize");
    }

    #[tokio::test]
    async fn generate_fails_as_a_whole() {
        let generator = ResponseGenerator::new(Arc::new(Recording {
            reply: Err(PortError::Completion {
                status: 500,
                message: "boom".to_string(),
            }),
            seen: Mutex::new(Vec::new()),
        }));

        assert!(generator.generate("Summarize", &sources()).await.is_err());
    }
}
