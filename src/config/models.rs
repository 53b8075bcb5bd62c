//! Provider catalog: endpoints, default models and token limits

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::SirError;

/// AI provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[serde(rename = "openai")]
    OpenAI,
    Anthropic,
    Google,
    #[serde(rename = "openrouter")]
    OpenRouter,
    Groq,
}

impl ProviderKind {
    /// Every supported provider, in display order
    pub const ALL: [Self; 5] = [
        Self::OpenAI,
        Self::Anthropic,
        Self::Google,
        Self::OpenRouter,
        Self::Groq,
    ];

    /// Identifier used on the command line and in config key paths
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::OpenRouter => "openrouter",
            Self::Groq => "groq",
        }
    }

    /// Vendor name used in error messages
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Google => "Google",
            Self::OpenRouter => "OpenRouter",
            Self::Groq => "Groq",
        }
    }

    /// Get the base URL for this provider
    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAI => "https://api.openai.com/v1",
            Self::Anthropic => "https://api.anthropic.com/v1",
            Self::Google => "https://generativelanguage.googleapis.com/v1beta",
            Self::OpenRouter => "https://openrouter.ai/api/v1",
            Self::Groq => "https://api.groq.com/openai/v1",
        }
    }

    /// Model used when the caller does not pick one
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::OpenAI => "gpt-4",
            Self::Anthropic => "claude-3-5-sonnet-20241022",
            Self::Google => "gemini-pro",
            Self::OpenRouter => "anthropic/claude-3.5-sonnet",
            Self::Groq => "llama-3.1-70b-versatile",
        }
    }

    /// Output token limit sent when the caller does not set one
    #[must_use]
    pub const fn default_max_tokens(self) -> u32 {
        match self {
            Self::OpenAI | Self::OpenRouter | Self::Groq => 2000,
            Self::Anthropic => 4096,
            Self::Google => 2048,
        }
    }

    /// Whether requests use the OpenAI chat-completions wire shape
    #[must_use]
    pub const fn is_openai_compatible(self) -> bool {
        matches!(self, Self::OpenAI | Self::OpenRouter | Self::Groq)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProviderKind {
    type Err = SirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == wanted)
            .ok_or_else(|| SirError::UnknownProvider(s.to_string()))
    }
}
