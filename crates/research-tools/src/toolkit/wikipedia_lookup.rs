//! Wikipedia Lookup Tool
//!
//! Encyclopedia lookup with the same caps as the Arxiv variant: one result,
//! 200 characters of extract.

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{Result as CoreResult, Tool, ToolSpec};

use super::format_snippets;
use crate::source::SearchSource;

const RESULT_LIMIT: usize = 1;
const CONTENT_CHAR_LIMIT: usize = 200;

/// Tool for looking up Wikipedia articles
pub struct WikipediaLookupTool {
    source: Arc<dyn SearchSource>,
}

impl WikipediaLookupTool {
    pub fn new(source: Arc<dyn SearchSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for WikipediaLookupTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            "wikipedia_lookup",
            "Look up an article on Wikipedia. Best for encyclopedic facts, \
             definitions, and summaries of well-known topics.",
        )
        .with_max_results(RESULT_LIMIT)
        .with_max_chars(CONTENT_CHAR_LIMIT)
    }

    async fn query(&self, input: &str) -> CoreResult<String> {
        let mut snippets = self.source.search(input, RESULT_LIMIT).await?;
        for snippet in &mut snippets {
            snippet.truncate_content(CONTENT_CHAR_LIMIT);
        }
        tracing::debug!(results = snippets.len(), "wikipedia lookup completed");
        Ok(format_snippets(&snippets))
    }
}
