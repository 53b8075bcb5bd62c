//! OpenAI API adapter
//!
//! Supports:
//! - OpenAI official API (GPT-4, etc.)
//! - OpenAI-compatible aggregators (OpenRouter, Groq)

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::models::ProviderKind,
    error::{Result, SirError},
    messages::Message,
};

use super::{missing_field, send_json, ChatAdapter, ChatOptions, ProviderConfig, DEFAULT_TEMPERATURE};

/// Attribution headers OpenRouter uses to identify the calling app
const OPENROUTER_REFERER: &str = "https://sircli.app";
const OPENROUTER_TITLE: &str = "SirCLI";

/// OpenAI chat-completions adapter
#[derive(Debug)]
pub struct OpenAIAdapter {
    client: Client,
    config: ProviderConfig,
}

impl OpenAIAdapter {
    /// Create a new OpenAI-compatible adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .default_headers({
                let mut headers = header::HeaderMap::new();
                headers.insert(
                    header::AUTHORIZATION,
                    header::HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(
                        |_| SirError::InvalidInput("Invalid API key format".to_string()),
                    )?,
                );
                if config.provider == ProviderKind::OpenRouter {
                    headers.insert(
                        "HTTP-Referer",
                        header::HeaderValue::from_static(OPENROUTER_REFERER),
                    );
                    headers.insert("X-Title", header::HeaderValue::from_static(OPENROUTER_TITLE));
                }
                headers
            })
            .build()?;

        Ok(Self { client, config })
    }

    /// Build the request body; the system message stays inline
    pub(crate) fn build_request(&self, messages: &[Message], options: &ChatOptions) -> OpenAIRequest {
        OpenAIRequest {
            model: self.config.model.clone(),
            messages: messages
                .iter()
                .map(|msg| OpenAIMessage {
                    role: msg.role.as_str().to_string(),
                    content: msg.content.clone(),
                })
                .collect(),
            temperature: options.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: self.config.max_tokens(options),
        }
    }

    fn extract_text(&self, response: OpenAIResponse) -> Result<String> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| missing_field(self.config.provider, "choices[0].message.content"))
    }
}

#[async_trait]
impl ChatAdapter for OpenAIAdapter {
    fn provider(&self) -> ProviderKind {
        self.config.provider
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn chat(&self, messages: &[Message], options: &ChatOptions) -> Result<String> {
        let request = self.build_request(messages, options);
        debug!(
            provider = %self.config.provider,
            model = %self.config.model,
            messages = request.messages.len(),
            "sending chat completion"
        );

        let response: OpenAIResponse = send_json(
            self.config.provider,
            self.client
                .post(format!("{}/chat/completions", self.config.base_url))
                .json(&request),
        )
        .await?;

        self.extract_text(response)
    }
}

// OpenAI API types

#[derive(Debug, Clone, Serialize)]
pub(crate) struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIChoice {
    message: Option<OpenAIResponseMessage>,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}
