//! Reasoning Loop
//!
//! Implements the ReAct (Reason + Act) pattern: the agent thinks (LLM
//! completion), acts (tool call), observes (tool output fed back as context),
//! and finishes when a completion carries no tool call. Each turn constructs
//! a fresh agent; the loop holds no state across turns.

use std::sync::Arc;

use futures::StreamExt;

use crate::error::{AgentError, Result};
use crate::event::{AgentEvent, EventSink};
use crate::message::{Conversation, Message};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::tool::{ToolCall, ToolRegistry, ToolResult};

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt template
    pub system_prompt: String,

    /// Maximum reasoning iterations before giving up
    pub max_iterations: usize,

    /// Generation options
    pub generation: GenerationOptions,

    /// Whether to append tool descriptions to the system prompt
    pub inject_tool_descriptions: bool,

    /// Recover from malformed tool-call blocks by feeding an instructive
    /// observation back to the model instead of failing the turn
    pub recover_parse_errors: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_iterations: 10,
            generation: GenerationOptions::default(),
            inject_tool_descriptions: true,
            recover_parse_errors: true,
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a helpful research assistant.

When you need to look something up, respond with a JSON block in this exact format:
```tool
{"tool": "tool_name", "input": "your query"}
```

After receiving tool results, synthesize them into a helpful response.
If you can answer directly without tools, do so.
Be concise and accurate."#;

/// A single-turn reasoning agent.
///
/// Constructed fresh per turn from the shared tool registry and a per-turn
/// provider handle; discarded after producing one answer.
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>) -> Self {
        Self::new(provider, tools, AgentConfig::default())
    }

    /// Build the full system prompt including tool descriptions
    fn build_system_prompt(&self) -> String {
        let mut prompt = self.config.system_prompt.clone();

        if self.config.inject_tool_descriptions && !self.tools.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(&self.tools.generate_prompt_section());
        }

        prompt
    }

    /// Run the agent on a conversation, returning the final answer
    pub async fn run(&self, conversation: &mut Conversation) -> Result<String> {
        self.run_inner(conversation, None).await
    }

    /// Run the agent, forwarding intermediate reasoning through `sink`.
    ///
    /// Events fire on this call's own execution path; a dropped receiver
    /// silences the stream without failing the turn.
    pub async fn run_with_events(
        &self,
        conversation: &mut Conversation,
        sink: &EventSink,
    ) -> Result<String> {
        self.run_inner(conversation, Some(sink)).await
    }

    /// Run with a simple string input (creates a temporary conversation)
    pub async fn ask(&self, question: &str) -> Result<String> {
        let mut conversation = Conversation::with_system_prompt(self.build_system_prompt());
        conversation.push(Message::user(question));
        self.run(&mut conversation).await
    }

    async fn run_inner(
        &self,
        conversation: &mut Conversation,
        sink: Option<&EventSink>,
    ) -> Result<String> {
        conversation.ensure_system_prompt(self.build_system_prompt());

        let mut iterations = 0;

        loop {
            iterations += 1;

            if iterations > self.config.max_iterations {
                return Err(AgentError::MaxIterations(self.config.max_iterations));
            }

            let content = self.think(conversation, sink).await?;
            conversation.push(Message::assistant(&content));

            match self.parse_tool_call(&content) {
                Ok(Some(tool_call)) => {
                    tracing::debug!(tool = %tool_call.tool, "Executing tool");
                    emit(sink, AgentEvent::ToolCall {
                        tool: tool_call.tool.clone(),
                        input: tool_call.input.clone(),
                    });

                    let result = self.execute_tool(&tool_call).await?;
                    emit(sink, AgentEvent::Observation {
                        tool: result.tool.clone(),
                        output: result.output.clone(),
                    });

                    conversation.push(Message::tool(format_tool_result(&result)));
                }
                Ok(None) => {
                    // No tool call - this is the final answer
                    emit(sink, AgentEvent::Answer {
                        content: content.clone(),
                    });
                    return Ok(content);
                }
                Err(e) if self.config.recover_parse_errors => {
                    tracing::debug!(error = %e, "Recovering from malformed tool call");
                    conversation.push(Message::tool(
                        "Your tool invocation could not be parsed. Respond with a valid \
                         JSON block: ```tool\n{\"tool\": \"tool_name\", \"input\": \"query\"}\n``` \
                         or answer the user directly."
                            .to_string(),
                    ));
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Produce one completion, streaming thought deltas when a sink is given
    async fn think(&self, conversation: &Conversation, sink: Option<&EventSink>) -> Result<String> {
        let Some(sink) = sink else {
            let completion = self
                .provider
                .complete(conversation.messages(), &self.config.generation)
                .await?;
            return Ok(completion.content);
        };

        let mut stream = self
            .provider
            .complete_stream(conversation.messages(), &self.config.generation)
            .await?;

        let mut content = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if !chunk.delta.is_empty() {
                content.push_str(&chunk.delta);
                emit(Some(sink), AgentEvent::Thought {
                    delta: chunk.delta,
                });
            }
            if chunk.done {
                break;
            }
        }

        Ok(content)
    }

    /// Parse a tool call from an LLM response.
    ///
    /// A fenced ```tool block containing invalid JSON is a parse error; a
    /// response with no block at all is a final answer.
    fn parse_tool_call(&self, content: &str) -> Result<Option<ToolCall>> {
        const FENCE_START: &str = "```tool";
        const FENCE_END: &str = "```";

        if let Some(start_idx) = content.find(FENCE_START) {
            let after_marker = &content[start_idx + FENCE_START.len()..];
            let Some(end_idx) = after_marker.find(FENCE_END) else {
                return Err(AgentError::Parse("Unterminated tool block".into()));
            };

            let json_str = after_marker[..end_idx].trim();
            let mut call: ToolCall = serde_json::from_str(json_str)
                .map_err(|e| AgentError::Parse(format!("Invalid tool call JSON: {}", e)))?;
            if call.id.is_none() {
                call.id = Some(uuid::Uuid::new_v4().to_string());
            }
            return Ok(Some(call));
        }

        // Fallback: a bare JSON object with a "tool" key
        Ok(parse_inline_tool_call(content))
    }

    /// Execute a tool call.
    ///
    /// A remote-call failure aborts the turn: there is no retry or degraded
    /// observation path, the caller resubmits.
    async fn execute_tool(&self, call: &ToolCall) -> Result<ToolResult> {
        let mut result = self.tools.execute(call).await?;
        result.id = call.id.clone();
        Ok(result)
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

fn emit(sink: Option<&EventSink>, event: AgentEvent) {
    if let Some(sink) = sink {
        // Receiver may already be gone; the turn continues regardless.
        let _ = sink.send(event);
    }
}

fn format_tool_result(result: &ToolResult) -> String {
    if result.success {
        format!("[Tool '{}' returned]\n{}", result.tool, result.output)
    } else {
        format!("[Tool '{}' failed]\n{}", result.tool, result.output)
    }
}

/// Try to parse a bare JSON tool call embedded in prose
fn parse_inline_tool_call(content: &str) -> Option<ToolCall> {
    if !content.contains(r#""tool""#) {
        return None;
    }

    let start = content.find('{')?;
    let end = content.rfind('}')?;

    if end <= start {
        return None;
    }

    serde_json::from_str::<ToolCall>(&content[start..=end]).ok()
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: Arc::new(ToolRegistry::new()),
            config: AgentConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = tools;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn recover_parse_errors(mut self, recover: bool) -> Self {
        self.config.recover_parse_errors = recover;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent::new(provider, self.tools, self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Completion, CompletionStream, StreamChunk};
    use crate::tool::{Tool, ToolSpec};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Provider that replays a script of canned responses
    struct ScriptedProvider {
        responses: Mutex<VecDeque<String>>,
    }

    impl ScriptedProvider {
        fn new(responses: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.iter().map(|s| (*s).to_string()).collect()),
            })
        }

        fn next_response(&self) -> String {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| "out of script".into())
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            _messages: &[Message],
            options: &GenerationOptions,
        ) -> Result<Completion> {
            Ok(Completion {
                content: self.next_response(),
                model: options.model.clone(),
                usage: None,
                finish_reason: None,
            })
        }

        async fn complete_stream(
            &self,
            _messages: &[Message],
            _options: &GenerationOptions,
        ) -> Result<CompletionStream> {
            let content = self.next_response();
            // Split into two chunks to exercise delta accumulation
            let mid = content.len() / 2;
            let mid = (0..=mid)
                .rev()
                .find(|i| content.is_char_boundary(*i))
                .unwrap_or(0);
            let (a, b) = content.split_at(mid);
            let chunks = vec![
                Ok(StreamChunk {
                    delta: a.to_string(),
                    done: false,
                    usage: None,
                }),
                Ok(StreamChunk {
                    delta: b.to_string(),
                    done: true,
                    usage: None,
                }),
            ];
            Ok(Box::pin(futures::stream::iter(chunks)))
        }
    }

    struct BrokenTool;

    #[async_trait]
    impl Tool for BrokenTool {
        fn spec(&self) -> ToolSpec {
            ToolSpec::new("capital", "Looks up a country's capital")
        }

        async fn query(&self, _input: &str) -> Result<String> {
            Err(AgentError::ToolExecution("upstream returned HTTP 503".into()))
        }
    }

    struct CapitalTool;

    #[async_trait]
    impl Tool for CapitalTool {
        fn spec(&self) -> ToolSpec {
            ToolSpec::new("capital", "Looks up a country's capital")
        }

        async fn query(&self, input: &str) -> Result<String> {
            Ok(format!("The capital of {} is Paris.", input))
        }
    }

    fn registry_with_capital() -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry.register(CapitalTool);
        Arc::new(registry)
    }

    #[tokio::test]
    async fn test_direct_answer() {
        let provider = ScriptedProvider::new(&["Paris is the capital of France."]);
        let agent = Agent::with_defaults(provider, registry_with_capital());

        let answer = agent.ask("What is the capital of France?").await.unwrap();
        assert_eq!(answer, "Paris is the capital of France.");
    }

    #[tokio::test]
    async fn test_tool_call_then_answer() {
        let provider = ScriptedProvider::new(&[
            "```tool\n{\"tool\": \"capital\", \"input\": \"France\"}\n```",
            "The capital of France is Paris.",
        ]);
        let agent = Agent::with_defaults(provider, registry_with_capital());

        let mut conversation = Conversation::new();
        conversation.push(Message::user("What is the capital of France?"));

        let answer = agent.run(&mut conversation).await.unwrap();
        assert_eq!(answer, "The capital of France is Paris.");

        // The observation was fed back into the working conversation
        assert!(conversation
            .messages()
            .iter()
            .any(|m| m.role == crate::Role::Tool && m.content.contains("Paris")));
    }

    #[tokio::test]
    async fn test_tool_failure_aborts_turn() {
        // A remote-call failure propagates; the scripted answer that would
        // follow is never requested.
        let provider = ScriptedProvider::new(&[
            "```tool\n{\"tool\": \"capital\", \"input\": \"France\"}\n```",
            "Answer that must never be produced.",
        ]);
        let mut registry = ToolRegistry::new();
        registry.register(BrokenTool);
        let agent = Agent::with_defaults(provider, Arc::new(registry));

        let mut conversation = Conversation::new();
        conversation.push(Message::user("What is the capital of France?"));

        let err = agent.run(&mut conversation).await.unwrap_err();
        assert!(matches!(err, AgentError::ToolExecution(_)));

        // No observation was appended after the failed call
        assert!(!conversation
            .messages()
            .iter()
            .any(|m| m.role == crate::Role::Tool));
    }

    #[tokio::test]
    async fn test_parse_error_recovery() {
        let provider = ScriptedProvider::new(&[
            "```tool\n{not valid json}\n```",
            "Recovered and answered.",
        ]);
        let agent = Agent::with_defaults(provider, registry_with_capital());

        let answer = agent.ask("hello").await.unwrap();
        assert_eq!(answer, "Recovered and answered.");
    }

    #[tokio::test]
    async fn test_parse_error_without_recovery() {
        let provider = ScriptedProvider::new(&["```tool\n{not valid json}\n```"]);
        let agent = AgentBuilder::new()
            .provider(provider)
            .tools(registry_with_capital())
            .recover_parse_errors(false)
            .build()
            .unwrap();

        let err = agent.ask("hello").await.unwrap_err();
        assert!(matches!(err, AgentError::Parse(_)));
    }

    #[tokio::test]
    async fn test_max_iterations() {
        // Provider that always calls a tool never finishes
        let call = "```tool\n{\"tool\": \"capital\", \"input\": \"France\"}\n```";
        let provider = ScriptedProvider::new(&[call, call, call, call]);
        let agent = AgentBuilder::new()
            .provider(provider)
            .tools(registry_with_capital())
            .max_iterations(3)
            .build()
            .unwrap();

        let err = agent.ask("loop forever").await.unwrap_err();
        assert!(matches!(err, AgentError::MaxIterations(3)));
    }

    #[tokio::test]
    async fn test_event_stream_order() {
        let provider = ScriptedProvider::new(&[
            "```tool\n{\"tool\": \"capital\", \"input\": \"France\"}\n```",
            "Paris.",
        ]);
        let agent = Agent::with_defaults(provider, registry_with_capital());

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut conversation = Conversation::new();
        conversation.push(Message::user("capital of France?"));

        let answer = agent.run_with_events(&mut conversation, &tx).await.unwrap();
        drop(tx);
        assert_eq!(answer, "Paris.");

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }

        // Thoughts first, then tool call + observation, then more thoughts,
        // then the final answer closes the stream.
        assert!(matches!(events.first(), Some(AgentEvent::Thought { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, AgentEvent::ToolCall { tool, .. } if tool == "capital")));
        assert!(events
            .iter()
            .any(|e| matches!(e, AgentEvent::Observation { .. })));
        assert!(
            matches!(events.last(), Some(AgentEvent::Answer { content }) if content == "Paris.")
        );
    }

    #[test]
    fn test_parse_fenced_tool_call() {
        let provider = ScriptedProvider::new(&[]);
        let agent = Agent::with_defaults(provider, Arc::new(ToolRegistry::new()));

        let content = "Let me check.\n```tool\n{\"tool\": \"capital\", \"input\": \"France\"}\n```";
        let call = agent.parse_tool_call(content).unwrap().unwrap();
        assert_eq!(call.tool, "capital");
        assert_eq!(call.input, "France");
        assert!(call.id.is_some());
    }

    #[test]
    fn test_plain_text_is_final_answer() {
        let provider = ScriptedProvider::new(&[]);
        let agent = Agent::with_defaults(provider, Arc::new(ToolRegistry::new()));

        assert!(agent.parse_tool_call("Just an answer.").unwrap().is_none());
    }

    #[test]
    fn test_inline_tool_call_fallback() {
        let call =
            parse_inline_tool_call(r#"I will search: {"tool": "capital", "input": "France"}"#)
                .unwrap();
        assert_eq!(call.tool, "capital");
    }
}
