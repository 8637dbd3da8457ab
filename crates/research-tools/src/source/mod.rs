//! Retrieval Sources
//!
//! Abstractions and implementations for the remote search APIs.

mod arxiv;
mod mock;
mod tavily;
mod wikipedia;

pub use arxiv::ArxivClient;
pub use mock::MockSource;
pub use tavily::TavilyClient;
pub use wikipedia::WikipediaClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::snippet::Snippet;

/// Search source trait (Strategy pattern)
///
/// Implement this for each remote provider. Implementations are stateless
/// and safe to call repeatedly and concurrently.
#[async_trait]
pub trait SearchSource: Send + Sync {
    /// Run a free-text query, returning at most `max_results` snippets
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Snippet>>;

    /// Source name
    fn name(&self) -> &str;
}
