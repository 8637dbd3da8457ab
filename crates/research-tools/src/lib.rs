//! # research-tools
//!
//! Retrieval tools for the research agent. Three sources sit behind the
//! [`SearchSource`] trait:
//!
//! - **Tavily** - hosted web search (credentialed, uncapped snippet list)
//! - **Arxiv** - academic paper lookup (1 result, 200 chars of content)
//! - **Wikipedia** - encyclopedia lookup (1 result, 200 chars of content)
//!
//! Each tool answers a free-text query with a short textual summary and is
//! stateless across turns: the reasoning loop may invoke any subset, in any
//! order, zero or more times per turn.

pub mod error;
pub mod snippet;
pub mod source;
pub mod toolkit;

pub use error::{ResearchError, Result};
pub use snippet::Snippet;
pub use source::{ArxivClient, MockSource, SearchSource, TavilyClient, WikipediaClient};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::toolkit::{ArxivLookupTool, WebSearchTool, WikipediaLookupTool};
}

/// System prompt for the research agent
pub const RESEARCH_AGENT_PROMPT: &str = r#"You are a helpful research assistant that can search the web, Arxiv, and Wikipedia.

## When Answering

1. If the question needs current or external information, use a tool first
2. Prefer `web_search` for news and general queries
3. Prefer `arxiv_lookup` for academic papers and research topics
4. Prefer `wikipedia_lookup` for encyclopedic facts and summaries
5. Synthesize tool results into your own answer; cite the source when useful
6. If you already know the answer with confidence, answer directly

## Tool Invocation

Respond with a JSON block in this exact format to call a tool:
```tool
{"tool": "tool_name", "input": "your query"}
```

One tool call per response. After the observation arrives, either call
another tool or write the final answer as plain text."#;
