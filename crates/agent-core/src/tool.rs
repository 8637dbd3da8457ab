//! Tool System
//!
//! Text-in/text-out tool framework for agent capabilities. Every tool answers
//! a single free-text query with a short textual summary; the reasoning loop
//! decides which tool to invoke, in what order, zero or more times per turn.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};

/// Tool call request parsed from the LLM response
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool identifier
    pub tool: String,

    /// Free-text query for the tool
    pub input: String,

    /// Optional call ID for tracking
    #[serde(default)]
    pub id: Option<String>,
}

impl ToolCall {
    pub fn new(tool: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            input: input.into(),
            id: Some(uuid::Uuid::new_v4().to_string()),
        }
    }
}

/// Result from tool execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool that was called
    pub tool: String,

    /// Call ID (if provided in request)
    pub id: Option<String>,

    /// Whether execution succeeded
    pub success: bool,

    /// Output (summary text or error)
    pub output: String,
}

impl ToolResult {
    pub fn success(tool: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            id: None,
            success: true,
            output: output.into(),
        }
    }

    pub fn failure(tool: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            id: None,
            success: false,
            output: error.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Tool descriptor: name, description shown to the LLM, and output caps.
///
/// Immutable after construction; shared read-only across all turns.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to the LLM)
    pub description: String,

    /// Maximum number of underlying results the tool will surface
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,

    /// Maximum characters of content per result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<usize>,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            max_results: None,
            max_chars: None,
        }
    }

    /// Cap the number of results surfaced by the tool
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = Some(max);
        self
    }

    /// Cap the content length per result
    pub fn with_max_chars(mut self, max: usize) -> Self {
        self.max_chars = Some(max);
        self
    }
}

/// Tool trait - implement to add new capabilities.
///
/// Implementations must be stateless between calls: the agent may invoke any
/// subset of tools, in any order, repeatedly and concurrently.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's descriptor
    fn spec(&self) -> ToolSpec;

    /// Answer a free-text query with a short textual summary
    async fn query(&self, input: &str) -> Result<String>;

    /// Validate the input before execution (optional)
    fn validate(&self, input: &str) -> Result<()> {
        if input.trim().is_empty() {
            return Err(AgentError::ToolValidation("Empty query".into()));
        }
        Ok(())
    }
}

/// Registry for available tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let spec = tool.spec();
        self.tools.insert(spec.name, Arc::new(tool));
    }

    /// Register a shared tool
    pub fn register_shared(&mut self, tool: Arc<dyn Tool>) {
        let spec = tool.spec();
        self.tools.insert(spec.name, tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Execute a tool call
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let tool = self
            .get(&call.tool)
            .ok_or_else(|| AgentError::ToolNotFound(call.tool.clone()))?;

        tool.validate(&call.input)?;

        let output = tool.query(&call.input).await?;
        Ok(ToolResult::success(&call.tool, output))
    }

    /// Get all tool descriptors
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|t| t.spec()).collect()
    }

    /// Get tool names
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Generate system prompt section describing available tools
    pub fn generate_prompt_section(&self) -> String {
        let mut prompt = String::from("## Available Tools\n\n");
        prompt.push_str("You can use a tool by responding with a JSON block:\n\n");
        prompt.push_str("```tool\n{\"tool\": \"tool_name\", \"input\": \"your query\"}\n```\n\n");

        let mut specs = self.specs();
        specs.sort_by(|a, b| a.name.cmp(&b.name));

        for spec in specs {
            prompt.push_str(&format!("### {}\n", spec.name));
            prompt.push_str(&format!("{}\n", spec.description));
            if let Some(max) = spec.max_results {
                prompt.push_str(&format!("Returns at most {} result(s).\n", max));
            }
            prompt.push('\n');
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn spec(&self) -> ToolSpec {
            ToolSpec::new("echo", "Echoes the query back").with_max_results(1)
        }

        async fn query(&self, input: &str) -> Result<String> {
            Ok(format!("echo: {}", input))
        }
    }

    #[tokio::test]
    async fn test_registry_execute() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        assert_eq!(registry.len(), 1);
        assert!(registry.get("echo").is_some());
        assert!(registry.get("unknown").is_none());

        let result = registry
            .execute(&ToolCall::new("echo", "hello"))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.output, "echo: hello");
    }

    #[tokio::test]
    async fn test_registry_rejects_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry
            .execute(&ToolCall::new("missing", "query"))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::ToolNotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_input_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let err = registry
            .execute(&ToolCall::new("echo", "  "))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::ToolValidation(_)));
    }

    #[test]
    fn test_prompt_section_lists_tools() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let prompt = registry.generate_prompt_section();
        assert!(prompt.contains("### echo"));
        assert!(prompt.contains("at most 1 result"));
    }
}
