//! Server Configuration
//!
//! Environment-driven configuration, loaded once at startup. A missing
//! search credential is fatal: the process halts before any tool is
//! constructed and before the listener binds.

use anyhow::{Context, Result};

/// Configuration loaded from the process environment
#[derive(Clone)]
pub struct ServerConfig {
    /// Tavily search credential. Required; read-only after startup.
    pub tavily_api_key: String,

    /// Listen address
    pub bind_addr: String,

    /// Model identifier passed to Groq on every turn
    pub model: String,
}

impl ServerConfig {
    /// Read configuration from the environment.
    ///
    /// The Groq API key is deliberately absent here: it is supplied
    /// per-session by the user, not by the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            std::env::var("TAVILY_API_KEY").ok(),
            std::env::var("BIND_ADDR").ok(),
            std::env::var("GROQ_MODEL").ok(),
        )
    }

    fn from_vars(
        tavily_api_key: Option<String>,
        bind_addr: Option<String>,
        model: Option<String>,
    ) -> Result<Self> {
        let tavily_api_key = tavily_api_key
            .filter(|key| !key.trim().is_empty())
            .context("TAVILY_API_KEY not found. Set it in the environment or a .env file.")?;

        Ok(Self {
            tavily_api_key,
            bind_addr: bind_addr.unwrap_or_else(|| "0.0.0.0:3000".into()),
            model: model.unwrap_or_else(|| "llama-3.3-70b-versatile".into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tavily_key_is_fatal() {
        assert!(ServerConfig::from_vars(None, None, None).is_err());
    }

    #[test]
    fn test_blank_tavily_key_is_fatal() {
        assert!(ServerConfig::from_vars(Some("   ".into()), None, None).is_err());
    }

    #[test]
    fn test_defaults() {
        let config =
            ServerConfig::from_vars(Some("tvly-test-key".into()), None, None).unwrap();
        assert_eq!(config.tavily_api_key, "tvly-test-key");
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.model, "llama-3.3-70b-versatile");
    }
}
