//! services/api/src/web/ask_task.rs
//!
//! Runs question answering on its own task. A client that disconnects while
//! waiting does not cancel the generation: the reply is still recorded.

use crate::web::state::AppState;
use notebook_assistant_core::conversation::{ask_across_notebooks, ask_notebook};
use notebook_assistant_core::ports::{PortError, PortResult};
use notebook_assistant_core::Message;
use std::sync::Arc;
use tracing::{error, info};

/// Asks inside one notebook and waits for the recorded assistant reply.
pub async fn spawn_notebook_ask(
    app_state: Arc<AppState>,
    notebook_id: String,
    prompt: String,
) -> PortResult<Option<Message>> {
    info!("Spawning ask task for notebook {}.", notebook_id);
    let task = tokio::spawn(async move {
        ask_notebook(
            &app_state.notebooks,
            &app_state.generator,
            &notebook_id,
            &prompt,
        )
        .await
    });
    join(task).await
}

/// Asks in the cross-notebook chat and waits for the recorded assistant reply.
pub async fn spawn_chat_ask(
    app_state: Arc<AppState>,
    notebook_ids: Vec<String>,
    prompt: String,
) -> PortResult<Option<Message>> {
    info!(
        "Spawning cross-notebook ask task over {} selected notebooks.",
        notebook_ids.len()
    );
    let task = tokio::spawn(async move {
        ask_across_notebooks(
            &app_state.chat,
            &app_state.notebooks,
            &app_state.generator,
            &notebook_ids,
            &prompt,
        )
        .await
    });
    join(task).await
}

async fn join(
    task: tokio::task::JoinHandle<PortResult<Option<Message>>>,
) -> PortResult<Option<Message>> {
    task.await.map_err(|e| {
        error!("Ask task did not complete: {}", e);
        PortError::Unexpected(e.to_string())
    })?
}
