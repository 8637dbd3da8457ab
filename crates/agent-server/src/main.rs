//! Research Agent HTTP Server
//!
//! Axum-based server providing the chat REST API, a WebSocket streaming
//! endpoint for intermediate reasoning, and the static WASM frontend.
//!
//! Startup order matters: the environment is loaded and validated before
//! any tool is constructed. A missing `TAVILY_API_KEY` halts the process
//! with a visible error before the server accepts a single request.

mod config;
mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{MemorySessionStore, ToolRegistry};
use research_tools::{
    tools::{ArxivLookupTool, WebSearchTool, WikipediaLookupTool},
    ArxivClient, TavilyClient, WikipediaClient,
};

use crate::config::ServerConfig;
use crate::handlers::{
    chat_handler, chat_stream_handler, health_check, list_tools, session_messages,
};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment first; config validation is fatal on a missing
    // search credential, before any tool exists.
    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env().inspect_err(|e| {
        tracing::error!("❌ {e}");
    })?;

    // Initialize tools
    let mut tools = ToolRegistry::new();
    tools.register(WebSearchTool::new(Arc::new(TavilyClient::new(
        config.tavily_api_key.clone(),
    ))));
    tools.register(ArxivLookupTool::new(Arc::new(ArxivClient::new())));
    tools.register(WikipediaLookupTool::new(Arc::new(WikipediaClient::new())));

    tracing::info!("Registered {} tools:", tools.len());
    let mut names = tools.names();
    names.sort_unstable();
    for name in names {
        tracing::info!("  • {}", name);
    }
    tracing::info!("Model: {}", config.model);

    // Build application state
    let state = AppState {
        tools: Arc::new(tools),
        sessions: Arc::new(MemorySessionStore::new()),
        model: config.model.clone(),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // Health & info
        .route("/health", get(health_check))
        .route("/api/tools", get(list_tools))
        .route("/api/sessions/{id}/messages", get(session_messages))
        // Agent API
        .route("/api/chat", post(chat_handler))
        .route("/api/chat/stream", get(chat_stream_handler))
        // Static files (WASM frontend)
        .nest_service("/", tower_http::services::ServeDir::new("static"))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🔎 research-agent server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                      - Health check");
    tracing::info!("  GET  /api/tools                   - List registered tools");
    tracing::info!("  GET  /api/sessions/{{id}}/messages  - Session history");
    tracing::info!("  POST /api/chat                    - Send message");
    tracing::info!("  GET  /api/chat/stream             - WebSocket streaming");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
