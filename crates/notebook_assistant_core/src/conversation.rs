//! crates/notebook_assistant_core/src/conversation.rs
//!
//! The ask flow: record the user's message, generate a reply over the relevant
//! sources and record the reply. A failed generation is logged and replaced by
//! a fixed apology so the conversation always gets exactly one assistant turn.

use crate::domain::{Message, NewMessage, Source};
use crate::generator::ResponseGenerator;
use crate::ports::PortResult;
use crate::store::{ChatStore, NotebookStore};
use tracing::{error, info, warn};

/// Assistant reply recorded in place of a failed generation.
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I couldn't generate a response. Please try again later.";

/// Asks a question inside one notebook, citing that notebook's sources.
///
/// Returns the recorded assistant message, or `None` when the prompt is blank
/// or the notebook does not exist.
pub async fn ask_notebook(
    store: &NotebookStore,
    generator: &ResponseGenerator,
    notebook_id: &str,
    prompt: &str,
) -> PortResult<Option<Message>> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Ok(None);
    }

    if store
        .add_message(notebook_id, NewMessage::user(prompt))
        .await?
        .is_none()
    {
        warn!("Ignoring question for unknown notebook {}.", notebook_id);
        return Ok(None);
    }

    let sources = store
        .get_notebook(notebook_id)
        .await
        .map(|notebook| notebook.sources)
        .unwrap_or_default();

    let reply = generate_reply(generator, prompt, &sources).await;
    // The notebook may have been deleted while the call was in flight; the reply is then dropped.
    store.add_message(notebook_id, reply).await
}

/// Asks a question in the cross-notebook chat.
///
/// Sources come from the selected notebooks, or from every notebook when the
/// selection is empty, flattened in notebook order.
pub async fn ask_across_notebooks(
    chat: &ChatStore,
    notebooks: &NotebookStore,
    generator: &ResponseGenerator,
    selected_notebook_ids: &[String],
    prompt: &str,
) -> PortResult<Option<Message>> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Ok(None);
    }

    chat.add_message(NewMessage::user(prompt)).await?;

    let sources: Vec<Source> = notebooks
        .notebooks()
        .await
        .into_iter()
        .filter(|n| selected_notebook_ids.is_empty() || selected_notebook_ids.contains(&n.id))
        .flat_map(|n| n.sources)
        .collect();

    let reply = generate_reply(generator, prompt, &sources).await;
    chat.add_message(reply).await.map(Some)
}

async fn generate_reply(generator: &ResponseGenerator, prompt: &str, sources: &[Source]) -> NewMessage {
    match generator.generate(prompt, sources).await {
        Ok(response) => {
            info!(
                "Generated reply with {} citations.",
                response.citations.len()
            );
            NewMessage::assistant(response.text, response.citations)
        }
        Err(e) => {
            error!("Error generating response: {}", e);
            NewMessage::assistant(FALLBACK_REPLY, Vec::new())
        }
    }
}
