//! Groq LLM Provider
//!
//! Implementation of `LlmProvider` over Groq's OpenAI-compatible
//! chat-completions API. A provider instance carries one user-supplied
//! credential and lives for a single turn; the key is never logged.

use agent_core::{
    error::{AgentError, Result},
    message::{Message, Role},
    provider::{
        Completion, CompletionStream, FinishReason, GenerationOptions, LlmProvider, StreamChunk,
        TokenUsage,
    },
};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest_eventsource::{Event, EventSource};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Groq provider configuration
#[derive(Clone)]
pub struct GroqConfig {
    /// API key, supplied per session by the user
    pub api_key: String,

    /// API base URL (override for tests)
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GroqConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: std::env::var("GROQ_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
            timeout_secs: 120,
        }
    }
}

/// Groq LLM provider
pub struct GroqProvider {
    client: reqwest::Client,
    config: GroqConfig,
}

impl GroqProvider {
    /// Create a provider carrying the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_config(GroqConfig::new(api_key))
    }

    /// Create from configuration
    pub fn from_config(config: GroqConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self { client, config }
    }

    /// Override the endpoint (for tests against a local server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn check_credential(&self) -> Result<()> {
        if self.config.api_key.trim().is_empty() {
            return Err(AgentError::Auth("No API key supplied".into()));
        }
        Ok(())
    }

    fn build_request(messages: &[Message], options: &GenerationOptions, stream: bool) -> ChatRequest {
        ChatRequest {
            model: options.model.clone(),
            messages: messages.iter().map(wire_message).collect(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            stop: options.stop_sequences.clone(),
            stream,
        }
    }
}

fn wire_message(message: &Message) -> WireMessage {
    let role = match message.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        // Observations travel as user context; the API has no generic
        // tool role outside its own function-calling protocol.
        Role::Tool => "user",
    };
    WireMessage {
        role: role.into(),
        content: message.content.clone(),
    }
}

fn map_status(status: reqwest::StatusCode, body: &str) -> AgentError {
    match status {
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            AgentError::Auth(format!("Groq rejected the API key (HTTP {})", status))
        }
        reqwest::StatusCode::TOO_MANY_REQUESTS => AgentError::RateLimited(body.to_string()),
        s if s.is_server_error() => AgentError::ProviderUnavailable(format!("HTTP {}", s)),
        s => AgentError::Provider(format!("HTTP {}: {}", s, body)),
    }
}

fn map_finish_reason(reason: Option<&str>) -> Option<FinishReason> {
    match reason {
        Some("stop") => Some(FinishReason::Stop),
        Some("length") => Some(FinishReason::Length),
        Some("content_filter") => Some(FinishReason::ContentFilter),
        Some(_) => Some(FinishReason::Error),
        None => None,
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
    stream: bool,
}

#[derive(Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    model: String,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: WireMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatChunk {
    choices: Vec<ChunkChoice>,
    #[serde(default)]
    x_groq: Option<XGroq>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: Delta,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct XGroq {
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl From<WireUsage> for TokenUsage {
    fn from(u: WireUsage) -> Self {
        Self {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }
    }
}

/// Parse one SSE data payload into a stream chunk.
///
/// Returns `Ok(None)` for keep-alive payloads with no choices.
fn parse_chunk(data: &str) -> Result<Option<StreamChunk>> {
    let chunk: ChatChunk = serde_json::from_str(data)
        .map_err(|e| AgentError::Provider(format!("Malformed stream chunk: {}", e)))?;

    let usage = chunk.x_groq.and_then(|x| x.usage).map(TokenUsage::from);

    let Some(choice) = chunk.choices.into_iter().next() else {
        return Ok(None);
    };

    Ok(Some(StreamChunk {
        delta: choice.delta.content.unwrap_or_default(),
        done: choice.finish_reason.is_some(),
        usage,
    }))
}

fn done_chunk() -> StreamChunk {
    StreamChunk {
        delta: String::new(),
        done: true,
        usage: None,
    }
}

// ============================================================================
// Provider impl
// ============================================================================

#[async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &str {
        "Groq"
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        self.check_credential()?;

        let request = Self::build_request(messages, options, false);
        tracing::debug!(model = %options.model, messages = messages.len(), "groq completion");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, &body));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Provider(format!("Malformed response: {}", e)))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Provider("Response carried no choices".into()))?;

        Ok(Completion {
            content: choice.message.content,
            model: body.model,
            usage: body.usage.map(TokenUsage::from),
            finish_reason: map_finish_reason(choice.finish_reason.as_deref()),
        })
    }

    async fn complete_stream(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<CompletionStream> {
        self.check_credential()?;

        let request = Self::build_request(messages, options, true);
        tracing::debug!(model = %options.model, messages = messages.len(), "groq completion stream");

        let builder = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request);

        let source = EventSource::new(builder)
            .map_err(|e| AgentError::Provider(format!("Stream setup failed: {}", e)))?;

        let stream = futures::stream::unfold(Some(source), |state| async move {
            let mut source = state?;
            loop {
                match source.next().await {
                    Some(Ok(Event::Open)) => {}
                    Some(Ok(Event::Message(message))) => {
                        if message.data.trim() == "[DONE]" {
                            source.close();
                            return Some((Ok(done_chunk()), None));
                        }
                        match parse_chunk(&message.data) {
                            Ok(Some(chunk)) => return Some((Ok(chunk), Some(source))),
                            Ok(None) => {}
                            Err(e) => {
                                source.close();
                                return Some((Err(e), None));
                            }
                        }
                    }
                    Some(Err(reqwest_eventsource::Error::StreamEnded)) => {
                        source.close();
                        return Some((Ok(done_chunk()), None));
                    }
                    Some(Err(reqwest_eventsource::Error::InvalidStatusCode(status, response))) => {
                        source.close();
                        let body = response.text().await.unwrap_or_default();
                        return Some((Err(map_status(status, &body)), None));
                    }
                    Some(Err(e)) => {
                        source.close();
                        return Some((Err(AgentError::Provider(e.to_string())), None));
                    }
                    None => return None,
                }
            }
        });

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let messages = vec![Message::system("You are helpful."), Message::user("Hello")];
        let options = GenerationOptions::default();
        let request = GroqProvider::build_request(&messages, &options, true);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama-3.3-70b-versatile");
        assert_eq!(json["stream"], true);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Hello");
        // Empty stop sequences stay off the wire
        assert!(json.get("stop").is_none());
    }

    #[test]
    fn test_tool_role_travels_as_user() {
        let messages = vec![Message::tool("[Tool 'web_search' returned]\n...")];
        let request = GroqProvider::build_request(&messages, &GenerationOptions::default(), false);
        assert_eq!(request.messages[0].role, "user");
    }

    #[test]
    fn test_parse_content_chunk() {
        let data = r#"{"choices":[{"delta":{"content":"Hel"},"finish_reason":null}]}"#;
        let chunk = parse_chunk(data).unwrap().unwrap();
        assert_eq!(chunk.delta, "Hel");
        assert!(!chunk.done);
    }

    #[test]
    fn test_parse_final_chunk_with_usage() {
        let data = r#"{"choices":[{"delta":{},"finish_reason":"stop"}],"x_groq":{"usage":{"prompt_tokens":10,"completion_tokens":5,"total_tokens":15}}}"#;
        let chunk = parse_chunk(data).unwrap().unwrap();
        assert!(chunk.done);
        assert_eq!(chunk.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn test_parse_malformed_chunk() {
        assert!(parse_chunk("not json").is_err());
    }

    #[test]
    fn test_empty_key_rejected() {
        let provider = GroqProvider::new("  ");
        assert!(matches!(
            provider.check_credential(),
            Err(AgentError::Auth(_))
        ));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            map_status(reqwest::StatusCode::UNAUTHORIZED, ""),
            AgentError::Auth(_)
        ));
        assert!(matches!(
            map_status(reqwest::StatusCode::TOO_MANY_REQUESTS, ""),
            AgentError::RateLimited(_)
        ));
        assert!(matches!(
            map_status(reqwest::StatusCode::BAD_GATEWAY, ""),
            AgentError::ProviderUnavailable(_)
        ));
    }
}
