//! # agent-core
//!
//! Provider-agnostic agent engine with an explicit ReAct reasoning loop and a
//! text-in/text-out tool system.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Agent                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │  Reasoning  │  │    Tool     │  │   LlmProvider       │  │
//! │  │    Loop     │──│   Registry  │──│   (Strategy)        │  │
//! │  └──────┬──────┘  └─────────────┘  └─────────────────────┘  │
//! │         │ AgentEvent stream (thoughts, tool calls, answer)  │
//! └─────────┴───────────────────────────────────────────────────┘
//! ```
//!
//! The reasoning loop is owned here rather than delegated to an external
//! framework: the agent thinks (streamed completion), acts (tool call),
//! observes (tool output fed back), and finishes (a completion with no tool
//! call is the final answer). Intermediate steps surface as [`AgentEvent`]s.

pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod reasoning;
pub mod session;
pub mod tool;

pub use error::{AgentError, Result};
pub use event::AgentEvent;
pub use message::{Conversation, Message, Role};
pub use provider::LlmProvider;
pub use reasoning::{Agent, AgentConfig};
pub use session::{MemorySessionStore, Session, SessionId, SessionStore};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult, ToolSpec};
