//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::ask_task::{spawn_chat_ask, spawn_notebook_ask};
use crate::web::protocol::{
    AddSourceRequest, AskRequest, AutomationResponse, ChatAskRequest, CitationResponse,
    CreateNotebookRequest, ListNotebooksQuery, ListOrder, MessageResponse, MessageRole,
    NotebookResponse, SegmentResponse, SelectNotebookRequest, SourceResponse, SourceType,
    ThemeName, ThemePayload, UpdateNotebookRequest,
};
use crate::web::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use notebook_assistant_core::automations::suggest_automations;
use notebook_assistant_core::ports::PortError;
use std::sync::Arc;
use tracing::error;
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_notebooks_handler,
        create_notebook_handler,
        get_current_notebook_handler,
        select_notebook_handler,
        get_notebook_handler,
        update_notebook_handler,
        delete_notebook_handler,
        add_source_handler,
        remove_source_handler,
        list_messages_handler,
        ask_handler,
        clear_messages_handler,
        list_automations_handler,
        list_chat_handler,
        chat_ask_handler,
        clear_chat_handler,
        get_theme_handler,
        set_theme_handler,
        toggle_theme_handler,
    ),
    components(
        schemas(
            NotebookResponse, SourceResponse, MessageResponse, CitationResponse,
            SegmentResponse, AutomationResponse, CreateNotebookRequest, UpdateNotebookRequest,
            SelectNotebookRequest, AddSourceRequest, AskRequest, ChatAskRequest, ThemePayload,
            SourceType, MessageRole, ThemeName, ListOrder,
        )
    ),
    tags(
        (name = "Notebook Assistant API", description = "Notebooks, sources and cited chat.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Error Mapping
//=========================================================================================

type HandlerError = (StatusCode, String);

fn not_found(what: &str) -> HandlerError {
    (StatusCode::NOT_FOUND, format!("{} not found", what))
}

fn internal(context: &str, e: PortError) -> HandlerError {
    error!("{}: {:?}", context, e);
    (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
}

//=========================================================================================
// Notebook Handlers
//=========================================================================================

/// List notebooks, optionally filtered by title and ordered.
#[utoipa::path(
    get,
    path = "/notebooks",
    params(ListNotebooksQuery),
    responses((status = 200, description = "Matching notebooks", body = [NotebookResponse]))
)]
pub async fn list_notebooks_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<ListNotebooksQuery>,
) -> Json<Vec<NotebookResponse>> {
    let now = Utc::now();
    let notebooks = app_state
        .notebooks
        .list(
            query.q.as_deref().unwrap_or_default(),
            query.order.unwrap_or_default().into(),
        )
        .await;
    Json(
        notebooks
            .into_iter()
            .map(|n| NotebookResponse::new(n, now))
            .collect(),
    )
}

/// Create an empty notebook and make it the current one.
#[utoipa::path(
    post,
    path = "/notebooks",
    request_body = CreateNotebookRequest,
    responses(
        (status = 201, description = "Notebook created", body = NotebookResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_notebook_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<CreateNotebookRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let notebook = app_state
        .notebooks
        .create_notebook(&request.title, request.emoji.as_deref())
        .await
        .map_err(|e| internal("Failed to create notebook", e))?;
    Ok((
        StatusCode::CREATED,
        Json(NotebookResponse::new(notebook, Utc::now())),
    ))
}

/// The currently selected notebook.
#[utoipa::path(
    get,
    path = "/notebooks/current",
    responses(
        (status = 200, description = "Current notebook", body = NotebookResponse),
        (status = 404, description = "No notebook selected")
    )
)]
pub async fn get_current_notebook_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<NotebookResponse>, HandlerError> {
    app_state
        .notebooks
        .current_notebook()
        .await
        .map(|n| Json(NotebookResponse::new(n, Utc::now())))
        .ok_or_else(|| not_found("Current notebook"))
}

/// Select (or clear) the current notebook.
#[utoipa::path(
    put,
    path = "/notebooks/current",
    request_body = SelectNotebookRequest,
    responses((status = 204, description = "Selection updated"))
)]
pub async fn select_notebook_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<SelectNotebookRequest>,
) -> StatusCode {
    app_state
        .notebooks
        .set_current_notebook(request.notebook_id)
        .await;
    StatusCode::NO_CONTENT
}

#[utoipa::path(
    get,
    path = "/notebooks/{id}",
    params(("id" = String, Path, description = "Notebook id")),
    responses(
        (status = 200, description = "The notebook", body = NotebookResponse),
        (status = 404, description = "Notebook not found")
    )
)]
pub async fn get_notebook_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<NotebookResponse>, HandlerError> {
    app_state
        .notebooks
        .get_notebook(&id)
        .await
        .map(|n| Json(NotebookResponse::new(n, Utc::now())))
        .ok_or_else(|| not_found("Notebook"))
}

/// Change a notebook's title and/or emoji.
#[utoipa::path(
    patch,
    path = "/notebooks/{id}",
    params(("id" = String, Path, description = "Notebook id")),
    request_body = UpdateNotebookRequest,
    responses(
        (status = 200, description = "Updated notebook", body = NotebookResponse),
        (status = 404, description = "Notebook not found")
    )
)]
pub async fn update_notebook_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateNotebookRequest>,
) -> Result<Json<NotebookResponse>, HandlerError> {
    app_state
        .notebooks
        .update_notebook(&id, request.into())
        .await
        .map_err(|e| internal("Failed to update notebook", e))?
        .map(|n| Json(NotebookResponse::new(n, Utc::now())))
        .ok_or_else(|| not_found("Notebook"))
}

#[utoipa::path(
    delete,
    path = "/notebooks/{id}",
    params(("id" = String, Path, description = "Notebook id")),
    responses(
        (status = 204, description = "Notebook deleted"),
        (status = 404, description = "Notebook not found")
    )
)]
pub async fn delete_notebook_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, HandlerError> {
    let deleted = app_state
        .notebooks
        .delete_notebook(&id)
        .await
        .map_err(|e| internal("Failed to delete notebook", e))?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Notebook"))
    }
}

//=========================================================================================
// Source Handlers
//=========================================================================================

#[utoipa::path(
    post,
    path = "/notebooks/{id}/sources",
    params(("id" = String, Path, description = "Notebook id")),
    request_body = AddSourceRequest,
    responses(
        (status = 201, description = "Source added", body = SourceResponse),
        (status = 400, description = "Missing title"),
        (status = 404, description = "Notebook not found")
    )
)]
pub async fn add_source_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<AddSourceRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if request.title.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "A source needs a title".to_string()));
    }
    let source = app_state
        .notebooks
        .add_source(&id, request.into())
        .await
        .map_err(|e| internal("Failed to add source", e))?
        .ok_or_else(|| not_found("Notebook"))?;
    Ok((StatusCode::CREATED, Json(SourceResponse::from(source))))
}

/// Remove a source. Citations that point at it are kept as they are.
#[utoipa::path(
    delete,
    path = "/notebooks/{id}/sources/{source_id}",
    params(
        ("id" = String, Path, description = "Notebook id"),
        ("source_id" = String, Path, description = "Source id")
    ),
    responses(
        (status = 204, description = "Source removed"),
        (status = 404, description = "Notebook or source not found")
    )
)]
pub async fn remove_source_handler(
    State(app_state): State<Arc<AppState>>,
    Path((id, source_id)): Path<(String, String)>,
) -> Result<StatusCode, HandlerError> {
    let removed = app_state
        .notebooks
        .remove_source(&id, &source_id)
        .await
        .map_err(|e| internal("Failed to remove source", e))?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Source"))
    }
}

//=========================================================================================
// Notebook Chat Handlers
//=========================================================================================

#[utoipa::path(
    get,
    path = "/notebooks/{id}/messages",
    params(("id" = String, Path, description = "Notebook id")),
    responses(
        (status = 200, description = "Chat history with rendered segments", body = [MessageResponse]),
        (status = 404, description = "Notebook not found")
    )
)]
pub async fn list_messages_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<MessageResponse>>, HandlerError> {
    let notebook = app_state
        .notebooks
        .get_notebook(&id)
        .await
        .ok_or_else(|| not_found("Notebook"))?;
    Ok(Json(
        notebook
            .messages
            .into_iter()
            .map(MessageResponse::from)
            .collect(),
    ))
}

/// Ask a question about the notebook's sources.
///
/// Records the question and the assistant reply. When generation fails the
/// reply is a fixed apology rather than an error.
#[utoipa::path(
    post,
    path = "/notebooks/{id}/messages",
    params(("id" = String, Path, description = "Notebook id")),
    request_body = AskRequest,
    responses(
        (status = 201, description = "Assistant reply", body = MessageResponse),
        (status = 400, description = "Empty prompt"),
        (status = 404, description = "Notebook not found")
    )
)]
pub async fn ask_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<AskRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if request.prompt.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Prompt is empty".to_string()));
    }
    let reply = spawn_notebook_ask(app_state, id, request.prompt)
        .await
        .map_err(|e| internal("Failed to record conversation", e))?
        .ok_or_else(|| not_found("Notebook"))?;
    Ok((StatusCode::CREATED, Json(MessageResponse::from(reply))))
}

#[utoipa::path(
    delete,
    path = "/notebooks/{id}/messages",
    params(("id" = String, Path, description = "Notebook id")),
    responses(
        (status = 204, description = "History cleared"),
        (status = 404, description = "Notebook not found")
    )
)]
pub async fn clear_messages_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, HandlerError> {
    let cleared = app_state
        .notebooks
        .clear_messages(&id)
        .await
        .map_err(|e| internal("Failed to clear messages", e))?;
    if cleared {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Notebook"))
    }
}

/// Suggested automations for the notebook's studio view.
#[utoipa::path(
    get,
    path = "/notebooks/{id}/automations",
    params(("id" = String, Path, description = "Notebook id")),
    responses(
        (status = 200, description = "Suggestions", body = [AutomationResponse]),
        (status = 404, description = "Notebook not found")
    )
)]
pub async fn list_automations_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<AutomationResponse>>, HandlerError> {
    let notebook = app_state
        .notebooks
        .get_notebook(&id)
        .await
        .ok_or_else(|| not_found("Notebook"))?;
    Ok(Json(
        suggest_automations(&notebook)
            .into_iter()
            .map(AutomationResponse::from)
            .collect(),
    ))
}

//=========================================================================================
// Cross-notebook Chat Handlers
//=========================================================================================

#[utoipa::path(
    get,
    path = "/chat",
    responses((status = 200, description = "Cross-notebook chat history", body = [MessageResponse]))
)]
pub async fn list_chat_handler(State(app_state): State<Arc<AppState>>) -> Json<Vec<MessageResponse>> {
    Json(
        app_state
            .chat
            .messages()
            .await
            .into_iter()
            .map(MessageResponse::from)
            .collect(),
    )
}

#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatAskRequest,
    responses(
        (status = 201, description = "Assistant reply", body = MessageResponse),
        (status = 400, description = "Empty prompt")
    )
)]
pub async fn chat_ask_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<ChatAskRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if request.prompt.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Prompt is empty".to_string()));
    }
    let reply = spawn_chat_ask(app_state, request.notebook_ids, request.prompt)
        .await
        .map_err(|e| internal("Failed to record conversation", e))?
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "Prompt is empty".to_string()))?;
    Ok((StatusCode::CREATED, Json(MessageResponse::from(reply))))
}

#[utoipa::path(
    delete,
    path = "/chat",
    responses((status = 204, description = "Chat history cleared"))
)]
pub async fn clear_chat_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<StatusCode, HandlerError> {
    app_state
        .chat
        .clear_messages()
        .await
        .map_err(|e| internal("Failed to clear chat", e))?;
    Ok(StatusCode::NO_CONTENT)
}

//=========================================================================================
// Theme Handlers
//=========================================================================================

#[utoipa::path(
    get,
    path = "/theme",
    responses((status = 200, description = "Current theme", body = ThemePayload))
)]
pub async fn get_theme_handler(State(app_state): State<Arc<AppState>>) -> Json<ThemePayload> {
    Json(ThemePayload {
        theme: app_state.theme.theme().await.into(),
    })
}

#[utoipa::path(
    put,
    path = "/theme",
    request_body = ThemePayload,
    responses((status = 200, description = "Theme stored", body = ThemePayload))
)]
pub async fn set_theme_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<ThemePayload>,
) -> Result<Json<ThemePayload>, HandlerError> {
    app_state
        .theme
        .set_theme(request.theme.into())
        .await
        .map_err(|e| internal("Failed to store theme", e))?;
    Ok(Json(request))
}

#[utoipa::path(
    post,
    path = "/theme/toggle",
    responses((status = 200, description = "Theme after toggling", body = ThemePayload))
)]
pub async fn toggle_theme_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<ThemePayload>, HandlerError> {
    let theme = app_state
        .theme
        .toggle_theme()
        .await
        .map_err(|e| internal("Failed to store theme", e))?;
    Ok(Json(ThemePayload {
        theme: theme.into(),
    }))
}
