pub mod ask_task;
pub mod protocol;
pub mod rest;
pub mod state;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use rest::{
    add_source_handler, ask_handler, chat_ask_handler, clear_chat_handler,
    clear_messages_handler, create_notebook_handler, delete_notebook_handler,
    get_current_notebook_handler, get_notebook_handler, get_theme_handler,
    list_automations_handler, list_chat_handler, list_messages_handler, list_notebooks_handler,
    remove_source_handler, select_notebook_handler, set_theme_handler, toggle_theme_handler,
    update_notebook_handler,
};
use state::AppState;
use std::sync::Arc;

/// Builds the API routes over the shared state. Middleware layers are added by the binary.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/notebooks",
            get(list_notebooks_handler).post(create_notebook_handler),
        )
        .route(
            "/notebooks/current",
            get(get_current_notebook_handler).put(select_notebook_handler),
        )
        .route(
            "/notebooks/{id}",
            get(get_notebook_handler)
                .patch(update_notebook_handler)
                .delete(delete_notebook_handler),
        )
        .route("/notebooks/{id}/sources", post(add_source_handler))
        .route(
            "/notebooks/{id}/sources/{source_id}",
            delete(remove_source_handler),
        )
        .route(
            "/notebooks/{id}/messages",
            get(list_messages_handler)
                .post(ask_handler)
                .delete(clear_messages_handler),
        )
        .route("/notebooks/{id}/automations", get(list_automations_handler))
        .route(
            "/chat",
            get(list_chat_handler)
                .post(chat_ask_handler)
                .delete(clear_chat_handler),
        )
        .route("/theme", get(get_theme_handler).put(set_theme_handler))
        .route("/theme/toggle", post(toggle_theme_handler))
        .with_state(app_state)
}
