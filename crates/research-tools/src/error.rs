//! Error Types for Retrieval Sources

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResearchError>;

#[derive(Error, Debug)]
pub enum ResearchError {
    #[error("Search provider error: {0}")]
    Api(String),

    #[error("Rejected credential for {0}")]
    Credential(String),

    #[error("Malformed response: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ResearchError> for agent_core::AgentError {
    fn from(err: ResearchError) -> Self {
        agent_core::AgentError::ToolExecution(err.to_string())
    }
}
