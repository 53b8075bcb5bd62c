//! SirCLI: AI-powered command-line assistant
//!
//! One chat contract over several AI vendors (OpenAI, Anthropic, Google,
//! OpenRouter, Groq) plus the local tools the CLI drives: file operations,
//! shell execution, downloads and web search.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::too_many_lines)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod messages;
pub mod services;
pub mod tools;

// Re-exports for convenience
pub use error::{Result, SirError};
pub use messages::{Message, Role};
pub use services::{resolve_adapter, Adapter, ChatAdapter, ChatOptions};
