//! Application State

use std::sync::Arc;

use agent_core::{MemorySessionStore, ToolRegistry};

/// Greeting that seeds every new session's history
pub const GREETING: &str = "Hi 👋 I can search the web, Arxiv, and Wikipedia.";

/// Shared application state.
///
/// No LLM provider lives here: one is built per turn from the
/// user-supplied Groq key.
#[derive(Clone)]
pub struct AppState {
    /// Tool registry with all available tools (constructed once at startup)
    pub tools: Arc<ToolRegistry>,

    /// Per-session conversation state, in memory for the process lifetime
    pub sessions: Arc<MemorySessionStore>,

    /// Model identifier used for every turn
    pub model: String,
}
