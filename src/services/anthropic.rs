//! Anthropic Claude API adapter
//!
//! The Messages API takes the system prompt as a top-level field, so it is
//! lifted out of the conversation before sending.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::models::ProviderKind,
    error::{Result, SirError},
    messages::{split_system, Message},
};

use super::{missing_field, send_json, ChatAdapter, ChatOptions, ProviderConfig};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic API adapter
#[derive(Debug)]
pub struct AnthropicAdapter {
    client: Client,
    config: ProviderConfig,
}

impl AnthropicAdapter {
    /// Create a new Anthropic adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .default_headers({
                let mut headers = header::HeaderMap::new();
                headers.insert(
                    "x-api-key",
                    header::HeaderValue::from_str(&config.api_key).map_err(|_| {
                        SirError::InvalidInput("Invalid API key format".to_string())
                    })?,
                );
                headers.insert(
                    "anthropic-version",
                    header::HeaderValue::from_static(ANTHROPIC_VERSION),
                );
                headers
            })
            .build()?;

        Ok(Self { client, config })
    }

    /// Build the request body with the system prompt moved to its own field
    pub(crate) fn build_request(&self, messages: &[Message], options: &ChatOptions) -> AnthropicRequest {
        let (system, dialogue) = split_system(messages);

        AnthropicRequest {
            model: self.config.model.clone(),
            messages: dialogue
                .into_iter()
                .map(|msg| AnthropicMessage {
                    role: msg.role.as_str().to_string(),
                    content: msg.content.clone(),
                })
                .collect(),
            system: system.map(str::to_string),
            max_tokens: self.config.max_tokens(options),
            temperature: options.temperature,
        }
    }

    fn extract_text(response: AnthropicResponse) -> Result<String> {
        response
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| missing_field(ProviderKind::Anthropic, "content[0].text"))
    }
}

#[async_trait]
impl ChatAdapter for AnthropicAdapter {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn chat(&self, messages: &[Message], options: &ChatOptions) -> Result<String> {
        let request = self.build_request(messages, options);
        debug!(
            model = %self.config.model,
            messages = request.messages.len(),
            has_system = request.system.is_some(),
            "sending anthropic message"
        );

        let response: AnthropicResponse = send_json(
            ProviderKind::Anthropic,
            self.client
                .post(format!("{}/messages", self.config.base_url))
                .json(&request),
        )
        .await?;

        Self::extract_text(response)
    }
}

// Anthropic API types

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Clone, Deserialize)]
struct AnthropicContentBlock {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn adapter() -> AnthropicAdapter {
        AnthropicAdapter::new(ProviderConfig::new(ProviderKind::Anthropic, "test-key", None)).unwrap()
    }

    #[test]
    fn test_system_message_moves_to_top_level() {
        let messages = vec![Message::system("S"), Message::user("U")];
        let request = adapter().build_request(&messages, &ChatOptions::default());

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "claude-3-5-sonnet-20241022",
                "messages": [{"role": "user", "content": "U"}],
                "system": "S",
                "max_tokens": 4096
            })
        );
    }

    #[test]
    fn test_system_field_absent_without_system_message() {
        let messages = vec![
            Message::user("hi"),
            Message::assistant("hello"),
            Message::user("bye"),
        ];
        let value = serde_json::to_value(adapter().build_request(&messages, &ChatOptions::default()))
            .unwrap();

        assert!(value.get("system").is_none());
        assert_eq!(
            value["messages"],
            json!([
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "hello"},
                {"role": "user", "content": "bye"}
            ])
        );
    }

    #[test]
    fn test_max_tokens_override() {
        let request = adapter().build_request(&[Message::user("x")], &ChatOptions::with_max_tokens(8000));
        assert_eq!(serde_json::to_value(&request).unwrap()["max_tokens"], json!(8000));
    }

    #[test]
    fn test_extract_text_empty_content() {
        let response: AnthropicResponse = serde_json::from_value(json!({"content": []})).unwrap();
        let err = AnthropicAdapter::extract_text(response).unwrap_err();
        assert!(err.to_string().starts_with("Anthropic API Error"));
    }

    #[test]
    fn test_extract_text_first_block() {
        let response: AnthropicResponse = serde_json::from_value(json!({
            "content": [{"type": "text", "text": "first"}, {"type": "text", "text": "second"}]
        }))
        .unwrap();
        assert_eq!(AnthropicAdapter::extract_text(response).unwrap(), "first");
    }
}
