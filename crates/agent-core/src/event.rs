//! Agent Events
//!
//! Intermediate reasoning events surfaced to the UI while a turn is in
//! flight. Events fire on the same execution path as the reasoning loop;
//! there are no separate tasks per event.

use serde::{Deserialize, Serialize};

/// An event emitted during a single agent turn.
///
/// Serialized with a `type` tag for the WebSocket wire format.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    /// A fragment of the model's streamed reasoning text
    Thought { delta: String },

    /// The agent decided to invoke a tool
    ToolCall { tool: String, input: String },

    /// A tool produced an observation
    Observation { tool: String, output: String },

    /// The final answer for the turn
    Answer { content: String },

    /// The turn failed; `message` is user-presentable
    Error { message: String },
}

/// Sender half for forwarding events out of the reasoning loop.
///
/// Unbounded so the loop never blocks on a slow consumer; a closed receiver
/// simply drops further events rather than failing the turn.
pub type EventSink = tokio::sync::mpsc::UnboundedSender<AgentEvent>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_format() {
        let event = AgentEvent::ToolCall {
            tool: "web_search".into(),
            input: "rust async".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "tool_call");
        assert_eq!(json["tool"], "web_search");
    }
}
