//! # agent-runtime
//!
//! Runtime providers for the research agent.
//!
//! ## Providers
//!
//! - **Groq**: hosted inference over the OpenAI-compatible chat-completions
//!   API, with SSE streaming. Built fresh per turn from the user-supplied
//!   API key.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::GroqProvider;
//!
//! let provider = GroqProvider::new(api_key);
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(provider))
//!     .build()?;
//! ```

pub mod groq;

pub use groq::{GroqConfig, GroqProvider};

// Re-export core types for convenience
pub use agent_core::{
    Agent, AgentError, LlmProvider, Message, Result, Role, Session, Tool, ToolRegistry,
};
