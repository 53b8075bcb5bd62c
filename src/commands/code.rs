//! `code` - generate or rewrite code with the default provider

use std::path::{Path, PathBuf};

use crossterm::style::Stylize;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{adapter_or_report, ui, ExitCode};
use crate::{
    config::ConfigStore,
    error::Result,
    messages::Message,
    services::{ChatAdapter, ChatOptions},
    tools::file_ops::resolve_path,
};

const BASE_SYSTEM_PROMPT: &str =
    "You are an expert programmer. Generate clean, efficient, and well-documented code.";

/// Output budget for code generation
const CODE_MAX_TOKENS: u32 = 4096;

static CODE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:\w+)?\n((?s:.*?))```").expect("valid code block regex"));

#[derive(Debug, Default)]
pub struct CodeArgs {
    pub prompt: String,
    pub language: Option<String>,
    pub file: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// System prompt, optionally pinned to a language
#[must_use]
pub fn system_prompt(language: Option<&str>) -> String {
    match language {
        Some(lang) => format!("{BASE_SYSTEM_PROMPT} Generate code in {lang}."),
        None => BASE_SYSTEM_PROMPT.to_string(),
    }
}

/// User prompt, with existing file content embedded ahead of the request
#[must_use]
pub fn user_prompt(prompt: &str, existing: Option<&str>) -> String {
    match existing {
        Some(code) => format!("Here's the current code:\n\n```\n{code}\n```\n\n{prompt}"),
        None => prompt.to_string(),
    }
}

/// Body of the first fenced code block, or the whole reply when there is none
#[must_use]
pub fn extract_code(response: &str) -> &str {
    CODE_BLOCK_RE
        .captures(response)
        .and_then(|caps| caps.get(1))
        .map_or(response, |m| m.as_str())
}

/// Run the code command
///
/// # Errors
///
/// Returns an error if the current directory cannot be resolved
pub async fn run(store: &ConfigStore, args: CodeArgs) -> Result<ExitCode> {
    let Some(adapter) = adapter_or_report(store, None, None) else {
        return Ok(1);
    };

    let existing = match &args.file {
        Some(path) => match tokio::fs::read_to_string(path).await {
            Ok(content) => Some(content),
            Err(err) => {
                ui::error(format!("Error reading file: {err}"));
                return Ok(1);
            }
        },
        None => None,
    };

    let messages = vec![
        Message::system(system_prompt(args.language.as_deref())),
        Message::user(user_prompt(&args.prompt, existing.as_deref())),
    ];

    let spinner = ui::spinner("Generating code...");
    let result = adapter
        .chat(&messages, &ChatOptions::with_max_tokens(CODE_MAX_TOKENS))
        .await;
    spinner.finish_and_clear();

    let response = match result {
        Ok(response) => response,
        Err(err) => {
            ui::error(format!("Error: {err}"));
            return Ok(0);
        }
    };

    println!("{}", "\n📝 Generated Code:\n".cyan());
    println!("{response}");
    println!();

    if let Some(output) = args.output {
        match save_code(&output, extract_code(&response)).await {
            Ok(path) => ui::success(format!("Code saved to: {}", path.display())),
            Err(err) => ui::error(format!("Error: {err}")),
        }
    }

    Ok(0)
}

async fn save_code(output: &Path, code: &str) -> Result<PathBuf> {
    let path = resolve_path(output)?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, code.trim()).await?;
    Ok(path)
}
