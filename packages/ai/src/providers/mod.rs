//! LLM provider abstraction and implementations.
//!
//! Supports `OpenAI` (and compatible servers) and Anthropic via a common
//! trait.

pub mod anthropic;
pub mod openai;

use serde::{Deserialize, Serialize};

use crate::AiError;

/// Speaker of a chat-completion message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions framing the conversation.
    System,
    /// The person asking.
    User,
    /// The model.
    Assistant,
}

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who is speaking.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl Message {
    /// Creates a message.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A single chat-completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Ordered messages, system messages first.
    pub messages: Vec<Message>,
    /// Maximum number of generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// Trait for LLM providers.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Sends a chat completion request and returns the generated text.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if the request fails or the response has no text.
    async fn complete(&self, request: &ChatRequest) -> Result<String, AiError>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}

/// Provider installed when no credentials are available.
///
/// Every call fails with [`AiError::Config`], so a missing API key surfaces
/// as a per-request error rather than a startup failure.
pub struct UnconfiguredProvider {
    reason: String,
}

impl UnconfiguredProvider {
    /// Creates a provider that always fails with `reason`.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for UnconfiguredProvider {
    async fn complete(&self, _request: &ChatRequest) -> Result<String, AiError> {
        Err(AiError::Config {
            message: self.reason.clone(),
        })
    }

    fn model(&self) -> &str {
        "unconfigured"
    }
}

/// Creates an LLM provider based on environment variables.
///
/// If `AI_PROVIDER` is explicitly set, uses that provider. Otherwise
/// auto-detects from available credentials:
///
/// 1. `OPENAI_API_KEY` set -> `OpenAI`
/// 2. `ANTHROPIC_API_KEY` set -> Anthropic Claude
///
/// `AI_MODEL` overrides the default model and `AI_BASE_URL` points the
/// `OpenAI` provider at a compatible server.
///
/// # Errors
///
/// Returns [`AiError::Config`] if no credentials are found or the
/// explicitly requested provider is not configured.
pub fn create_provider_from_env() -> Result<Box<dyn LlmProvider>, AiError> {
    let provider = std::env::var("AI_PROVIDER").unwrap_or_else(|_| detect_provider());

    match provider.to_lowercase().as_str() {
        "openai" | "gpt" => {
            let base_url = std::env::var("AI_BASE_URL").ok();
            // Local OpenAI-compatible servers usually don't need a key.
            let api_key = match std::env::var("OPENAI_API_KEY") {
                Ok(key) => key,
                Err(_) if base_url.is_some() => String::new(),
                Err(_) => {
                    return Err(AiError::Config {
                        message: "OPENAI_API_KEY environment variable not set".to_string(),
                    });
                }
            };
            let model = std::env::var("AI_MODEL")
                .unwrap_or_else(|_| openai::DEFAULT_MODEL.to_string());
            let provider = openai::OpenAiProvider::new(api_key, model);
            Ok(Box::new(match base_url {
                Some(url) => provider.with_base_url(url),
                None => provider,
            }))
        }
        "anthropic" | "claude" => {
            let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| AiError::Config {
                message: "ANTHROPIC_API_KEY environment variable not set".to_string(),
            })?;
            let model = std::env::var("AI_MODEL")
                .unwrap_or_else(|_| anthropic::DEFAULT_MODEL.to_string());
            Ok(Box::new(anthropic::AnthropicProvider::new(api_key, model)))
        }
        other => Err(AiError::Config {
            message: format!("Unknown AI provider: {other}. Use 'openai' or 'anthropic'."),
        }),
    }
}

/// Like [`create_provider_from_env`], but falls back to an
/// [`UnconfiguredProvider`] instead of failing.
#[must_use]
pub fn provider_from_env_or_unconfigured() -> Box<dyn LlmProvider> {
    match create_provider_from_env() {
        Ok(provider) => {
            log::info!("Using AI model {}", provider.model());
            provider
        }
        Err(e) => {
            log::warn!("AI provider unavailable, chat requests will fail: {e}");
            Box::new(UnconfiguredProvider::new(e.to_string()))
        }
    }
}

/// Auto-detects which provider to use based on available credentials.
fn detect_provider() -> String {
    if std::env::var("OPENAI_API_KEY").is_ok() || std::env::var("AI_BASE_URL").is_ok() {
        log::info!("Auto-detected AI provider: OpenAI");
        return "openai".to_string();
    }

    if std::env::var("ANTHROPIC_API_KEY").is_ok() {
        log::info!("Auto-detected AI provider: Anthropic (ANTHROPIC_API_KEY found)");
        return "anthropic".to_string();
    }

    log::warn!(
        "No AI credentials detected. Set OPENAI_API_KEY or ANTHROPIC_API_KEY, \
         or AI_BASE_URL for a local server. You can also set AI_PROVIDER explicitly."
    );

    // Fall back to openai, which will produce a clear error about the missing key
    "openai".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_provider_fails_with_config_error() {
        let provider = UnconfiguredProvider::new("OPENAI_API_KEY environment variable not set");
        let request = ChatRequest {
            messages: vec![Message::new(Role::User, "hello")],
            max_tokens: 10,
            temperature: 0.0,
        };
        let err = provider.complete(&request).await.unwrap_err();
        assert!(matches!(err, AiError::Config { .. }));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), "\"system\"");
    }
}
