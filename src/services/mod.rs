//! Service layer for external AI providers
//!
//! This module provides adapters for the supported chat completion APIs:
//! - OpenAI (and the OpenAI-compatible OpenRouter and Groq endpoints)
//! - Anthropic (Claude)
//! - Google (Gemini)
//!
//! Every adapter answers the same question: given a conversation, what did
//! the model reply? Vendor differences (system prompt placement, role names,
//! authentication, response envelope) stay inside the vendor module.

pub mod anthropic;
pub mod google;
pub mod openai;

use std::fmt;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::{
    config::models::ProviderKind,
    error::{Result, SirError},
    messages::Message,
};

pub use self::{anthropic::AnthropicAdapter, google::GoogleAdapter, openai::OpenAIAdapter};

/// Sampling temperature used when the caller does not set one
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Per-call options; `None` falls back to the vendor default
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChatOptions {
    /// Temperature for sampling
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

impl ChatOptions {
    #[must_use]
    pub const fn with_max_tokens(max_tokens: u32) -> Self {
        Self {
            temperature: None,
            max_tokens: Some(max_tokens),
        }
    }
}

/// Credentials and endpoint for one adapter instance
#[derive(Clone)]
pub struct ProviderConfig {
    pub provider: ProviderKind,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl ProviderConfig {
    /// Build a config using the provider's fixed endpoint, falling back to
    /// its default model when `model` is `None`
    #[must_use]
    pub fn new(provider: ProviderKind, api_key: impl Into<String>, model: Option<&str>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            model: model.unwrap_or(provider.default_model()).to_string(),
            base_url: provider.default_base_url().to_string(),
        }
    }

    /// Point the adapter at a different endpoint (mock servers, proxies)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn max_tokens(&self, options: &ChatOptions) -> u32 {
        options
            .max_tokens
            .unwrap_or_else(|| self.provider.default_max_tokens())
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Core trait for chat adapters
///
/// One call, no retry: a failure of any kind comes back as
/// [`SirError::Provider`] carrying a human-readable message.
#[async_trait]
pub trait ChatAdapter: Send + Sync {
    /// Provider this adapter talks to
    fn provider(&self) -> ProviderKind;

    /// Get the model name
    fn model(&self) -> &str;

    /// Send a conversation and return the assistant's reply text verbatim
    async fn chat(&self, messages: &[Message], options: &ChatOptions) -> Result<String>;
}

/// A chat adapter for one of the supported vendors
#[derive(Debug)]
pub enum Adapter {
    /// OpenAI, OpenRouter and Groq
    OpenAI(OpenAIAdapter),
    Anthropic(AnthropicAdapter),
    Google(GoogleAdapter),
}

impl Adapter {
    /// Create the adapter matching `config.provider`
    ///
    /// # Errors
    ///
    /// Returns an error if the API key cannot be used as a header value or the
    /// HTTP client cannot be built
    pub fn new(config: ProviderConfig) -> Result<Self> {
        Ok(if config.provider.is_openai_compatible() {
            Self::OpenAI(OpenAIAdapter::new(config)?)
        } else if config.provider == ProviderKind::Anthropic {
            Self::Anthropic(AnthropicAdapter::new(config)?)
        } else {
            Self::Google(GoogleAdapter::new(config)?)
        })
    }

    fn inner(&self) -> &dyn ChatAdapter {
        match self {
            Self::OpenAI(adapter) => adapter,
            Self::Anthropic(adapter) => adapter,
            Self::Google(adapter) => adapter,
        }
    }
}

#[async_trait]
impl ChatAdapter for Adapter {
    fn provider(&self) -> ProviderKind {
        self.inner().provider()
    }

    fn model(&self) -> &str {
        self.inner().model()
    }

    async fn chat(&self, messages: &[Message], options: &ChatOptions) -> Result<String> {
        self.inner().chat(messages, options).await
    }
}

/// Resolve a provider identifier (case-insensitive) to a ready adapter
///
/// # Errors
///
/// Returns [`SirError::UnknownProvider`] for an unrecognized identifier, or an
/// error if the adapter cannot be constructed
pub fn resolve_adapter(provider: &str, api_key: &str, model: Option<&str>) -> Result<Adapter> {
    let kind: ProviderKind = provider.parse()?;
    Adapter::new(ProviderConfig::new(kind, api_key, model))
}

/// Send a prepared request and decode the JSON body, folding every failure
/// into a provider error
pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: ProviderKind,
    request: RequestBuilder,
) -> Result<T> {
    let name = provider.display_name();

    let response = request
        .send()
        .await
        .map_err(|e| SirError::provider(name, e.without_url().to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| SirError::provider(name, e.without_url().to_string()))?;

    debug!(provider = %provider, status = status.as_u16(), bytes = body.len(), "received response");

    if !status.is_success() {
        let message = error_detail(&body)
            .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
        return Err(SirError::provider(name, message));
    }

    serde_json::from_str(&body)
        .map_err(|e| SirError::provider(name, format!("Unexpected response format: {e}")))
}

/// Vendor-reported error detail (`error.message`), shared by all three APIs
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Error for a response whose text path does not resolve
pub(crate) fn missing_field(provider: ProviderKind, path: &str) -> SirError {
    SirError::provider(
        provider.display_name(),
        format!("Unexpected response format: missing {path}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_default_models() {
        for kind in ProviderKind::ALL {
            let adapter = resolve_adapter(kind.id(), "key", None).unwrap();
            assert_eq!(adapter.provider(), kind);
            assert_eq!(adapter.model(), kind.default_model());
        }
    }

    #[test]
    fn test_openai_compatible_providers_share_adapter() {
        for kind in ProviderKind::ALL {
            let adapter = resolve_adapter(kind.id(), "key", None).unwrap();
            assert_eq!(
                matches!(adapter, Adapter::OpenAI(_)),
                kind.is_openai_compatible(),
                "{kind}"
            );
        }
        assert!(matches!(
            resolve_adapter("anthropic", "key", None).unwrap(),
            Adapter::Anthropic(_)
        ));
        assert!(matches!(
            resolve_adapter("google", "key", None).unwrap(),
            Adapter::Google(_)
        ));
    }

    #[test]
    fn test_resolve_model_override() {
        for kind in ProviderKind::ALL {
            let adapter = resolve_adapter(kind.id(), "key", Some("custom-model")).unwrap();
            assert_eq!(adapter.model(), "custom-model");
        }
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        for id in ["OpenAI", "OPENAI", "openai"] {
            let adapter = resolve_adapter(id, "key", None).unwrap();
            assert_eq!(adapter.provider(), ProviderKind::OpenAI);
            assert_eq!(adapter.model(), "gpt-4");
        }
    }

    #[test]
    fn test_resolve_unknown_provider() {
        for id in ["not-a-real-provider", "openaiz"] {
            let err = resolve_adapter(id, "key", None).unwrap_err();
            match err {
                SirError::UnknownProvider(name) => assert_eq!(name, id),
                other => panic!("expected UnknownProvider, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_error_detail_extraction() {
        let body = r#"{"error":{"message":"Invalid API key","type":"invalid_request_error"}}"#;
        assert_eq!(error_detail(body).as_deref(), Some("Invalid API key"));
        assert!(error_detail("<html>Bad Gateway</html>").is_none());
        assert!(error_detail(r#"{"error":"flat"}"#).is_none());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ProviderConfig::new(ProviderKind::Groq, "gsk-secret-value", None);
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("gsk-secret-value"));
        assert!(rendered.contains("llama-3.1-70b-versatile"));
    }

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let config = ProviderConfig::new(ProviderKind::OpenAI, "k", None)
            .with_base_url("http://127.0.0.1:9999/");
        assert_eq!(config.base_url, "http://127.0.0.1:9999");
    }
}
