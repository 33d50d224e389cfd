//! Footprint tips and free-form questions over a chat-completion provider.
//!
//! Both operations send one fixed-shape request (system framing plus the
//! user text) and return the trimmed reply. Failures are returned as
//! [`AiError`]; [`render_reply`] turns either outcome into display text.

use std::sync::Arc;

use crate::AiError;
use crate::providers::{ChatRequest, LlmProvider, Message, Role};

/// Maximum generated tokens per reply.
pub const MAX_TOKENS: u32 = 300;

/// Sampling temperature for every request.
pub const TEMPERATURE: f32 = 0.7;

const SYSTEM_PROMPT: &str = "You are a friendly sustainability assistant. \
    Give concise, practical advice on reducing personal carbon emissions.";

/// Builds the tips prompt for a monthly footprint in kg CO2e.
#[must_use]
pub fn tips_prompt(footprint_kg: f64) -> String {
    format!(
        "My carbon footprint is {footprint_kg:.2} kg CO2e per month. \
         Give me practical tips to reduce it."
    )
}

/// Renders an adapter result for display: the reply itself, or
/// `"Error: <message>"`.
#[must_use]
pub fn render_reply(result: &Result<String, AiError>) -> String {
    match result {
        Ok(text) => text.clone(),
        Err(e) => format!("Error: {e}"),
    }
}

/// Sends tips and chat requests to a configured provider.
#[derive(Clone)]
pub struct TipsAdapter {
    provider: Arc<dyn LlmProvider>,
}

impl TipsAdapter {
    /// Wraps a provider.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Asks for reduction tips for the given monthly footprint.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if the provider call fails.
    pub async fn get_tips(&self, footprint_kg: f64) -> Result<String, AiError> {
        self.send(tips_prompt(footprint_kg)).await
    }

    /// Passes arbitrary user text through as the prompt.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if the provider call fails.
    pub async fn get_bot_response(&self, user_text: &str) -> Result<String, AiError> {
        self.send(user_text.to_string()).await
    }

    async fn send(&self, prompt: String) -> Result<String, AiError> {
        let request = ChatRequest {
            messages: vec![
                Message::new(Role::System, SYSTEM_PROMPT),
                Message::new(Role::User, prompt),
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        log::debug!("Sending chat request to {}", self.provider.model());

        match self.provider.complete(&request).await {
            Ok(text) => Ok(text.trim().to_string()),
            Err(e) => {
                log::error!("Chat request to {} failed: {e}", self.provider.model());
                Err(e)
            }
        }
    }
}
