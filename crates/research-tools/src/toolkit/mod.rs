//! Toolkit - Agent Tools
//!
//! Retrieval tools that implement `agent_core::Tool` over the search sources.

mod arxiv_lookup;
mod web_search;
mod wikipedia_lookup;

pub use arxiv_lookup::ArxivLookupTool;
pub use web_search::WebSearchTool;
pub use wikipedia_lookup::WikipediaLookupTool;

use crate::snippet::Snippet;

/// Render snippets as a numbered list for the model to read
fn format_snippets(snippets: &[Snippet]) -> String {
    if snippets.is_empty() {
        return "No results found.".into();
    }

    let mut output = String::new();
    for (i, snippet) in snippets.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        match &snippet.url {
            Some(url) => output.push_str(&format!("{}. {} ({})\n", i + 1, snippet.title, url)),
            None => output.push_str(&format!("{}. {}\n", i + 1, snippet.title)),
        }
        output.push_str(&format!("   {}", snippet.content));
    }
    output
}
