//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{JsonFileAdapter, OpenAiCompletionAdapter, ToolkitCompletionAdapter},
    config::{CompletionProvider, Config, PersistenceBackend},
    error::ApiError,
    web::{self, rest::ApiDoc, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use axum::Router;
use notebook_assistant_core::ports::{CompletionService, PersistenceService};
use notebook_assistant_core::MemoryPersistence;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open Persistence ---
    let persistence: Arc<dyn PersistenceService> = match config.persistence {
        PersistenceBackend::File => {
            info!("Persisting state under {}.", config.data_dir.display());
            Arc::new(JsonFileAdapter::new(&config.data_dir).await?)
        }
        PersistenceBackend::Memory => {
            info!("Keeping state in memory only.");
            Arc::new(MemoryPersistence::new())
        }
    };

    // --- 3. Initialize the Completion Adapter ---
    let completion: Arc<dyn CompletionService> = match config.completion_provider {
        CompletionProvider::Toolkit => {
            info!("Using completion endpoint {}.", config.completion_url);
            Arc::new(ToolkitCompletionAdapter::new(
                reqwest::Client::new(),
                config.completion_url.clone(),
            ))
        }
        CompletionProvider::OpenAi => {
            let api_key = config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| ApiError::Internal("OPENAI_API_KEY is required".to_string()))?;
            info!("Using OpenAI model {}.", config.completion_model);
            let openai_client = Client::with_config(OpenAIConfig::new().with_api_key(api_key));
            Arc::new(OpenAiCompletionAdapter::new(
                openai_client,
                config.completion_model.clone(),
            ))
        }
    };

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(persistence, completion).await);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    let app = Router::new()
        .merge(web::router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
