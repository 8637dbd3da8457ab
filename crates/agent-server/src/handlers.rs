//! HTTP/WebSocket Handlers
//!
//! One turn per submission: the user message is recorded, a fresh provider
//! and agent are built from the request's Groq key, the agent runs (its
//! reasoning streamed over the WebSocket variant), and the final answer is
//! appended to the session. A failed turn appends no assistant message.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::Response,
    Json,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};

use agent_core::{
    event::EventSink,
    message::Conversation,
    provider::GenerationOptions,
    reasoning::{Agent, AgentConfig},
    AgentError, LlmProvider, Session, SessionId, SessionStore,
};
use agent_runtime::GroqProvider;
use research_tools::RESEARCH_AGENT_PROMPT;

use crate::state::{AppState, GREETING};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub tools: usize,
}

/// A chat submission. `api_key` is the user's Groq credential; it is used
/// for exactly one turn and never logged or stored.
#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub session_id: String,
    pub model: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Serialize)]
pub struct SessionMessagesResponse {
    pub session_id: String,
    pub messages: Vec<agent_core::Message>,
}

fn error_response(err: &AgentError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match err {
        AgentError::Auth(_) => (StatusCode::UNAUTHORIZED, "INVALID_API_KEY"),
        AgentError::RateLimited(_) => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
        AgentError::ProviderUnavailable(_) => (StatusCode::BAD_GATEWAY, "PROVIDER_UNAVAILABLE"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "AGENT_ERROR"),
    };
    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
            code: code.into(),
        }),
    )
}

// ============================================================================
// Turn Executor
// ============================================================================

/// Execute one turn against a session.
///
/// The user message is recorded up front (dispatched); the agent runs on a
/// scratch conversation so its tool observations never enter the display
/// history; the assistant answer is appended only on success (completed).
pub(crate) async fn run_turn(
    provider: Arc<dyn LlmProvider>,
    state: &AppState,
    session_id: Option<String>,
    message: &str,
    sink: Option<&EventSink>,
) -> Result<(Session, String), AgentError> {
    let mut session = match session_id {
        Some(id) => {
            let id = SessionId::from_string(id);
            state
                .sessions
                .load(&id)?
                .unwrap_or_else(|| Session::with_greeting(GREETING))
        }
        None => Session::with_greeting(GREETING),
    };

    session.push_user(message);
    state.sessions.save(&session)?;

    // Scratch conversation: display history only; the system prompt is
    // inserted by the agent, and tool observations stay out of the session.
    let mut scratch = Conversation::new();
    for msg in session.conversation.messages() {
        scratch.push(msg.clone());
    }

    let config = AgentConfig {
        system_prompt: RESEARCH_AGENT_PROMPT.into(),
        generation: GenerationOptions {
            model: state.model.clone(),
            ..Default::default()
        },
        ..Default::default()
    };

    let agent = Agent::new(provider, state.tools.clone(), config);

    let answer = match sink {
        Some(sink) => agent.run_with_events(&mut scratch, sink).await?,
        None => agent.run(&mut scratch).await?,
    };

    session.push_assistant(&answer);
    state.sessions.save(&session)?;

    Ok((session, answer))
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        tools: state.tools.len(),
    })
}

/// List registered tool descriptors
pub async fn list_tools(State(state): State<AppState>) -> Json<Vec<agent_core::ToolSpec>> {
    let mut specs = state.tools.specs();
    specs.sort_by(|a, b| a.name.cmp(&b.name));
    Json(specs)
}

/// Display history for a session
pub async fn session_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionMessagesResponse>, (StatusCode, Json<ErrorResponse>)> {
    let session_id = SessionId::from_string(&id);
    let session = state
        .sessions
        .load(&session_id)
        .map_err(|e| error_response(&e))?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("No session {}", id),
                    code: "SESSION_NOT_FOUND".into(),
                }),
            )
        })?;

    Ok(Json(SessionMessagesResponse {
        session_id: id,
        messages: session.conversation.messages().to_vec(),
    }))
}

/// Main chat endpoint (non-streaming)
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let provider: Arc<dyn LlmProvider> = Arc::new(GroqProvider::new(payload.api_key));

    let (session, answer) = run_turn(
        provider,
        &state,
        payload.session_id,
        &payload.message,
        None,
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Turn failed");
        error_response(&e)
    })?;

    Ok(Json(ChatResponse {
        message: answer,
        session_id: session.id.to_string(),
        model: state.model.clone(),
    }))
}

/// WebSocket streaming chat
pub async fn chat_stream_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_stream(socket, state))
}

async fn handle_stream(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::error!(error = %e, "WebSocket error");
                break;
            }
            _ => continue,
        };

        let request: ChatRequest = match serde_json::from_str(&msg) {
            Ok(r) => r,
            Err(e) => {
                let frame = serde_json::json!({"type": "error", "message": e.to_string()});
                if sender.send(Message::Text(frame.to_string().into())).await.is_err() {
                    break;
                }
                continue;
            }
        };

        let provider: Arc<dyn LlmProvider> = Arc::new(GroqProvider::new(request.api_key));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        // The turn and the event forwarder run on this task; events fire on
        // the same execution path as the reasoning loop.
        let turn = async {
            let result = run_turn(
                provider,
                &state,
                request.session_id,
                &request.message,
                Some(&tx),
            )
            .await;
            drop(tx);
            result
        };

        let forward = async {
            while let Some(event) = rx.recv().await {
                let Ok(text) = serde_json::to_string(&event) else {
                    continue;
                };
                if sender.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
        };

        let (result, ()) = tokio::join!(turn, forward);

        match result {
            Ok((session, _answer)) => {
                let frame = serde_json::json!({
                    "type": "done",
                    "session_id": session.id.to_string(),
                });
                if sender.send(Message::Text(frame.to_string().into())).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Streaming turn failed");
                let frame = serde_json::json!({
                    "type": "error",
                    "message": e.user_message(),
                });
                if sender.send(Message::Text(frame.to_string().into())).await.is_err() {
                    break;
                }
            }
        }
    }
}
