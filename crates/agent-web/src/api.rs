//! Wire Types and Endpoint Helpers

use serde::{Deserialize, Serialize};

/// Chat message for display
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// One frame from the streaming endpoint
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamFrame {
    Thought { delta: String },
    ToolCall { tool: String, input: String },
    Observation { tool: String, output: String },
    Answer { content: String },
    Done { session_id: String },
    Error { message: String },
}

/// Build the chat request frame sent over the WebSocket
pub fn chat_request(message: &str, api_key: &str, session_id: Option<&str>) -> String {
    serde_json::json!({
        "message": message,
        "api_key": api_key,
        "session_id": session_id,
    })
    .to_string()
}

/// WebSocket URL for the streaming endpoint, derived from the page origin
pub fn stream_url() -> String {
    let location = web_sys::window().map(|w| w.location());
    let protocol = location
        .as_ref()
        .and_then(|l| l.protocol().ok())
        .unwrap_or_else(|| "http:".into());
    let host = location
        .as_ref()
        .and_then(|l| l.host().ok())
        .unwrap_or_else(|| "localhost:3000".into());

    let ws_protocol = if protocol == "https:" { "wss" } else { "ws" };
    format!("{}://{}/api/chat/stream", ws_protocol, host)
}
