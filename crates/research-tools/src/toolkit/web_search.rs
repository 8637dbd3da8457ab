//! Web Search Tool
//!
//! Generic web search over a hosted provider (Tavily in production).

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{Result as CoreResult, Tool, ToolSpec};

use super::format_snippets;
use crate::source::SearchSource;

const DEFAULT_MAX_RESULTS: usize = 5;

/// Tool for searching the web
pub struct WebSearchTool {
    source: Arc<dyn SearchSource>,
    max_results: usize,
}

impl WebSearchTool {
    pub fn new(source: Arc<dyn SearchSource>) -> Self {
        Self {
            source,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            "web_search",
            "Search the web for current information, news, and general queries. \
             Returns a list of result snippets with links.",
        )
        .with_max_results(self.max_results)
    }

    async fn query(&self, input: &str) -> CoreResult<String> {
        let snippets = self.source.search(input, self.max_results).await?;
        tracing::debug!(results = snippets.len(), "web search completed");
        Ok(format_snippets(&snippets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snippet::Snippet;
    use crate::source::MockSource;

    #[tokio::test]
    async fn test_formats_results() {
        let source = Arc::new(MockSource::new(
            "tavily",
            vec![
                Snippet::new("Rust", "A systems language.", "tavily")
                    .with_url("https://rust-lang.org"),
            ],
        ));
        let tool = WebSearchTool::new(source);

        let output = tool.query("rust language").await.unwrap();
        assert!(output.contains("Rust"));
        assert!(output.contains("https://rust-lang.org"));
    }

    #[tokio::test]
    async fn test_source_error_propagates() {
        let tool = WebSearchTool::new(Arc::new(MockSource::failing("tavily")));
        assert!(tool.query("anything").await.is_err());
    }
}
