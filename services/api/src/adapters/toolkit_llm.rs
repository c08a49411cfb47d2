//! services/api/src/adapters/toolkit_llm.rs
//!
//! This module contains the adapter for the plain JSON text-completion endpoint.
//! It implements the `CompletionService` port from the `core` crate.

use async_trait::async_trait;
use notebook_assistant_core::ports::{CompletionMessage, CompletionService, PortError, PortResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Serialize)]
struct ToolkitRequest<'a> {
    messages: Vec<ToolkitMessage<'a>>,
}

#[derive(Serialize)]
struct ToolkitMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ToolkitResponse {
    completion: String,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `CompletionService` against a `{ messages }` -> `{ completion }` endpoint.
#[derive(Clone)]
pub struct ToolkitCompletionAdapter {
    client: Client,
    url: String,
}

impl ToolkitCompletionAdapter {
    /// Creates a new `ToolkitCompletionAdapter`.
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }

    fn request_body(messages: &[CompletionMessage]) -> ToolkitRequest<'_> {
        ToolkitRequest {
            messages: messages
                .iter()
                .map(|m| ToolkitMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
        }
    }

    fn parse_body(body: &str) -> PortResult<String> {
        serde_json::from_str::<ToolkitResponse>(body)
            .map(|response| response.completion)
            .map_err(|e| PortError::Unexpected(format!("malformed completion body: {}", e)))
    }
}

//=========================================================================================
// `CompletionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CompletionService for ToolkitCompletionAdapter {
    async fn complete(&self, messages: &[CompletionMessage]) -> PortResult<String> {
        let resp = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&Self::request_body(messages))
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if !status.is_success() {
            warn!("Completion endpoint answered {}.", status);
            return Err(PortError::Completion {
                status: status.as_u16(),
                message: text,
            });
        }

        debug!("Completion endpoint answered with {} bytes.", text.len());
        Self::parse_body(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::CONTENT_TYPE, HeaderMap, StatusCode};
    use axum::{routing::post, Json, Router};
    use notebook_assistant_core::ports::CompletionRole;
    use serde_json::{json, Value};

    #[test]
    fn request_body_is_a_plain_message_list() {
        let messages = vec![
            CompletionMessage {
                role: CompletionRole::System,
                content: "context".to_string(),
            },
            CompletionMessage {
                role: CompletionRole::User,
                content: "Summarize".to_string(),
            },
        ];

        let body = serde_json::to_value(ToolkitCompletionAdapter::request_body(&messages)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "messages": [
                    { "role": "system", "content": "context" },
                    { "role": "user", "content": "Summarize" }
                ]
            })
        );
    }

    #[test]
    fn completion_field_is_extracted() {
        let text = ToolkitCompletionAdapter::parse_body(r#"{"completion":"Point one [1]."}"#).unwrap();
        assert_eq!(text, "Point one [1].");
    }

    #[test]
    fn bodies_without_a_completion_are_errors() {
        for body in ["", "not json", r#"{"text":"hi"}"#, r#"{"completion":42}"#] {
            assert!(ToolkitCompletionAdapter::parse_body(body).is_err(), "{}", body);
        }
    }

    /// Serves `router` on an ephemeral local port and returns its URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/text/llm/", addr)
    }

    fn prompt() -> Vec<CompletionMessage> {
        vec![CompletionMessage {
            role: CompletionRole::User,
            content: "Summarize".to_string(),
        }]
    }

    #[tokio::test]
    async fn complete_posts_json_and_returns_the_completion() {
        let router = Router::new().route(
            "/text/llm/",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers[CONTENT_TYPE], "application/json");
                assert_eq!(body["messages"][0]["role"], "user");
                assert_eq!(body["messages"][0]["content"], "Summarize");
                Json(json!({ "completion": "x [1]" }))
            }),
        );
        let adapter = ToolkitCompletionAdapter::new(Client::new(), serve(router).await);

        assert_eq!(adapter.complete(&prompt()).await.unwrap(), "x [1]");
    }

    #[tokio::test]
    async fn non_success_status_is_a_completion_error() {
        let router = Router::new().route(
            "/text/llm/",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model overloaded") }),
        );
        let adapter = ToolkitCompletionAdapter::new(Client::new(), serve(router).await);

        match adapter.complete(&prompt()).await {
            Err(PortError::Completion { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "model overloaded");
            }
            other => panic!("expected a completion error, got {:?}", other),
        }
    }
}
