//! Anthropic Claude provider implementation.

use serde::{Deserialize, Serialize};

use super::{ChatRequest, LlmProvider, Role};
use crate::AiError;

/// Model used when `AI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Anthropic Claude API provider.
pub struct AnthropicProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider.
    #[must_use]
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }

    /// System messages go in the top-level `system` field; the rest stay in
    /// order.
    fn build_request<'a>(&'a self, request: &'a ChatRequest) -> AnthropicRequest<'a> {
        let system = request
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let messages = request
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| AnthropicMessage {
                role: m.role,
                content: &m.content,
            })
            .collect();

        AnthropicRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system,
            messages,
        }
    }
}

/// Anthropic API request body.
#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "String::is_empty")]
    system: String,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: Role,
    content: &'a str,
}

/// Anthropic API response body.
#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

/// Anthropic API error response.
#[derive(Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

#[derive(Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

fn parse_response(status: reqwest::StatusCode, body: &str) -> Result<String, AiError> {
    if !status.is_success() {
        let err: AnthropicError = serde_json::from_str(body).unwrap_or_else(|_| AnthropicError {
            error: AnthropicErrorDetail {
                message: format!("HTTP {status}: {body}"),
            },
        });
        return Err(AiError::Provider {
            message: err.error.message,
        });
    }

    let response: AnthropicResponse = serde_json::from_str(body)?;

    let text = response
        .content
        .into_iter()
        .filter_map(|block| match block {
            AnthropicContentBlock::Text { text } => Some(text),
            AnthropicContentBlock::Other => None,
        })
        .collect::<Vec<_>>()
        .join("\n");

    if text.is_empty() {
        Err(AiError::EmptyResponse)
    } else {
        Ok(text)
    }
}

#[async_trait::async_trait]
impl LlmProvider for AnthropicProvider {
    async fn complete(&self, request: &ChatRequest) -> Result<String, AiError> {
        let body = self.build_request(request);

        let resp = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        parse_response(status, &text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::Message;
    use reqwest::StatusCode;

    #[test]
    fn system_messages_move_to_system_field() {
        let provider = AnthropicProvider::new("key".to_string(), "claude-test".to_string());
        let request = ChatRequest {
            messages: vec![
                Message::new(Role::System, "You are helpful."),
                Message::new(Role::User, "Tips please"),
            ],
            max_tokens: 300,
            temperature: 0.7,
        };
        let json = serde_json::to_value(provider.build_request(&request)).unwrap();

        assert_eq!(json["system"], "You are helpful.");
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 300);
    }

    #[test]
    fn no_system_field_without_system_messages() {
        let provider = AnthropicProvider::new("key".to_string(), "claude-test".to_string());
        let request = ChatRequest {
            messages: vec![Message::new(Role::User, "hi")],
            max_tokens: 5,
            temperature: 0.0,
        };
        let json = serde_json::to_value(provider.build_request(&request)).unwrap();
        assert!(json.get("system").is_none());
    }

    #[test]
    fn joins_text_blocks() {
        let body = r#"{"content":[{"type":"text","text":"Walk."},{"type":"text","text":"Bike."}]}"#;
        assert_eq!(parse_response(StatusCode::OK, body).unwrap(), "Walk.\nBike.");
    }

    #[test]
    fn auth_failure_is_provider_error() {
        let body = r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
        let err = parse_response(StatusCode::UNAUTHORIZED, body).unwrap_err();
        assert_eq!(err.to_string(), "Provider error: invalid x-api-key");
    }
}
