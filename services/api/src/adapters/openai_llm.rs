//! services/api/src/adapters/openai_llm.rs
//!
//! This module contains the adapter for OpenAI chat completions.
//! It implements the `CompletionService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use notebook_assistant_core::ports::{
    CompletionMessage, CompletionRole, CompletionService, PortError, PortResult,
};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `CompletionService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiCompletionAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiCompletionAdapter {
    /// Creates a new `OpenAiCompletionAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

fn to_request_message(message: &CompletionMessage) -> PortResult<ChatCompletionRequestMessage> {
    let built = match message.role {
        CompletionRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(message.content.as_str())
            .build()
            .map(ChatCompletionRequestMessage::from),
        CompletionRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(message.content.as_str())
            .build()
            .map(ChatCompletionRequestMessage::from),
    };
    built.map_err(|e| PortError::Unexpected(e.to_string()))
}

//=========================================================================================
// `CompletionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CompletionService for OpenAiCompletionAdapter {
    async fn complete(&self, messages: &[CompletionMessage]) -> PortResult<String> {
        let messages = messages
            .iter()
            .map(to_request_message)
            .collect::<PortResult<Vec<_>>>()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // A rejected request surfaces as an API error; keep its message for the log.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected("Completion response contained no text content.".to_string())
            })
    }
}
