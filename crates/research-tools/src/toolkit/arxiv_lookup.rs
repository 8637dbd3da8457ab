//! Arxiv Lookup Tool
//!
//! Academic paper lookup, capped to a single result with 200 characters of
//! abstract text. The model elaborates on top of the snippet; the cap bounds
//! only what the tool feeds back.

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{Result as CoreResult, Tool, ToolSpec};

use super::format_snippets;
use crate::source::SearchSource;

const RESULT_LIMIT: usize = 1;
const CONTENT_CHAR_LIMIT: usize = 200;

/// Tool for looking up papers on Arxiv
pub struct ArxivLookupTool {
    source: Arc<dyn SearchSource>,
}

impl ArxivLookupTool {
    pub fn new(source: Arc<dyn SearchSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for ArxivLookupTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            "arxiv_lookup",
            "Look up academic papers on Arxiv. Best for research topics, \
             scientific questions, and paper references.",
        )
        .with_max_results(RESULT_LIMIT)
        .with_max_chars(CONTENT_CHAR_LIMIT)
    }

    async fn query(&self, input: &str) -> CoreResult<String> {
        let mut snippets = self.source.search(input, RESULT_LIMIT).await?;
        for snippet in &mut snippets {
            snippet.truncate_content(CONTENT_CHAR_LIMIT);
        }
        tracing::debug!(results = snippets.len(), "arxiv lookup completed");
        Ok(format_snippets(&snippets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snippet::Snippet;
    use crate::source::MockSource;

    #[tokio::test]
    async fn test_caps_one_result_and_200_chars() {
        let long_abstract = "entropy ".repeat(100);
        let source = Arc::new(MockSource::new(
            "arxiv",
            vec![
                Snippet::new("Paper One", long_abstract.clone(), "arxiv"),
                Snippet::new("Paper Two", long_abstract, "arxiv"),
            ],
        ));
        let tool = ArxivLookupTool::new(source);

        let output = tool.query("entropy bounds").await.unwrap();

        // One underlying result only
        assert!(output.contains("Paper One"));
        assert!(!output.contains("Paper Two"));

        // Content after the "1. Title\n   " prefix is capped at 200 chars
        let content = output.split("\n   ").nth(1).unwrap();
        assert!(content.chars().count() <= 200);
    }

    #[tokio::test]
    async fn test_no_results() {
        let tool = ArxivLookupTool::new(Arc::new(MockSource::new("arxiv", vec![])));
        assert_eq!(tool.query("nothing").await.unwrap(), "No results found.");
    }
}
