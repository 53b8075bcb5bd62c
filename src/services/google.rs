//! Google Gemini API adapter
//!
//! `generateContent` has no system role: system messages are dropped,
//! assistant turns become `model` turns, and the key travels as a query
//! parameter.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::models::ProviderKind,
    error::Result,
    messages::{Message, Role},
};

use super::{missing_field, send_json, ChatAdapter, ChatOptions, ProviderConfig, DEFAULT_TEMPERATURE};

/// Google Generative Language API adapter
#[derive(Debug)]
pub struct GoogleAdapter {
    client: Client,
    config: ProviderConfig,
}

impl GoogleAdapter {
    /// Create a new Google adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    /// Build the request body; system messages are not representable
    pub(crate) fn build_request(&self, messages: &[Message], options: &ChatOptions) -> GoogleRequest {
        GoogleRequest {
            contents: messages
                .iter()
                .filter(|msg| !msg.is_system())
                .map(|msg| GoogleContent {
                    role: match msg.role {
                        Role::Assistant => "model",
                        Role::User | Role::System => "user",
                    }
                    .to_string(),
                    parts: vec![GooglePart {
                        text: msg.content.clone(),
                    }],
                })
                .collect(),
            generation_config: GenerationConfig {
                temperature: options.temperature.unwrap_or(DEFAULT_TEMPERATURE),
                max_output_tokens: self.config.max_tokens(options),
            },
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    fn extract_text(response: GoogleResponse) -> Result<String> {
        response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| missing_field(ProviderKind::Google, "candidates[0].content.parts[0].text"))
    }
}

#[async_trait]
impl ChatAdapter for GoogleAdapter {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Google
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn chat(&self, messages: &[Message], options: &ChatOptions) -> Result<String> {
        let request = self.build_request(messages, options);
        debug!(
            model = %self.config.model,
            contents = request.contents.len(),
            "sending generateContent"
        );

        let response: GoogleResponse = send_json(
            ProviderKind::Google,
            self.client
                .post(self.endpoint())
                .query(&[("key", self.config.api_key.as_str())])
                .json(&request),
        )
        .await?;

        Self::extract_text(response)
    }
}

// Google API types

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GoogleRequest {
    contents: Vec<GoogleContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
struct GoogleContent {
    role: String,
    parts: Vec<GooglePart>,
}

#[derive(Debug, Clone, Serialize)]
struct GooglePart {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    candidates: Vec<GoogleCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct GoogleCandidate {
    content: Option<GoogleResponseContent>,
}

#[derive(Debug, Clone, Deserialize)]
struct GoogleResponseContent {
    #[serde(default)]
    parts: Vec<GoogleResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
struct GoogleResponsePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn adapter() -> GoogleAdapter {
        GoogleAdapter::new(ProviderConfig::new(ProviderKind::Google, "test-key", None)).unwrap()
    }

    #[test]
    fn test_system_message_dropped_and_roles_mapped() {
        let messages = vec![
            Message::system("S"),
            Message::user("U"),
            Message::assistant("A"),
        ];
        let request = adapter().build_request(&messages, &ChatOptions::with_max_tokens(100));
        let wire = serde_json::to_string(&request).unwrap();

        assert!(!wire.contains("\"S\""));
        let value: serde_json::Value = serde_json::from_str(&wire).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "U"}]},
                    {"role": "model", "parts": [{"text": "A"}]}
                ],
                "generationConfig": {"temperature": 0.7, "maxOutputTokens": 100}
            })
        );
    }

    #[test]
    fn test_default_max_output_tokens() {
        let request = adapter().build_request(&[Message::user("U")], &ChatOptions::default());
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["generationConfig"]["maxOutputTokens"], json!(2048));
    }

    #[test]
    fn test_endpoint_uses_model() {
        let adapter = GoogleAdapter::new(
            ProviderConfig::new(ProviderKind::Google, "k", Some("gemini-1.5-flash"))
                .with_base_url("http://localhost:1234"),
        )
        .unwrap();
        assert_eq!(
            adapter.endpoint(),
            "http://localhost:1234/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_extract_text_missing_parts() {
        let response: GoogleResponse =
            serde_json::from_value(json!({"candidates": [{"content": {"parts": []}}]})).unwrap();
        assert!(GoogleAdapter::extract_text(response).is_err());

        let response: GoogleResponse = serde_json::from_value(json!({})).unwrap();
        assert!(GoogleAdapter::extract_text(response).is_err());
    }
}
