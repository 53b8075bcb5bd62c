//! `chat` - one-shot or interactive conversation with a model

use crossterm::style::Stylize;
use rustyline::{error::ReadlineError, DefaultEditor};
use tracing::debug;

use super::{adapter_or_report, ui, ExitCode};
use crate::{
    config::ConfigStore,
    error::{Result, SirError},
    messages::Message,
    services::{ChatAdapter, ChatOptions},
};

/// Words that end an interactive session
const EXIT_WORDS: &[&str] = &["exit", "quit", "q"];

#[derive(Debug, Default)]
pub struct ChatArgs {
    pub message: Option<String>,
    pub model: Option<String>,
    pub provider: Option<String>,
    pub system: Option<String>,
}

/// Whether a line typed in interactive mode ends the session
#[must_use]
pub fn is_exit_command(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    EXIT_WORDS.contains(&input.as_str())
}

/// Run the chat command
///
/// # Errors
///
/// Returns an error if the interactive line editor cannot be created
pub async fn run(store: &ConfigStore, args: ChatArgs) -> Result<ExitCode> {
    let Some(adapter) = adapter_or_report(store, args.provider.as_deref(), args.model.as_deref())
    else {
        return Ok(1);
    };
    debug!(provider = %adapter.provider(), model = adapter.model(), "chat adapter ready");

    let mut messages = Vec::new();
    if let Some(system) = args.system {
        messages.push(Message::system(system));
    }

    match args.message {
        Some(message) => {
            messages.push(Message::user(message));
            send(&adapter, &messages).await;
            Ok(0)
        }
        None => interactive(&adapter, messages).await,
    }
}

/// Send the conversation and print the reply; failures are printed, not returned
async fn send(adapter: &dyn ChatAdapter, messages: &[Message]) -> Option<String> {
    let spinner = ui::spinner("Thinking...");
    let result = adapter.chat(messages, &ChatOptions::default()).await;
    spinner.finish_and_clear();

    match result {
        Ok(reply) => {
            println!("{}", "\n🤖 Assistant:\n".cyan());
            println!("{reply}");
            println!();
            Some(reply)
        }
        Err(err) => {
            ui::error(format!("Error: {err}"));
            None
        }
    }
}

async fn interactive(adapter: &dyn ChatAdapter, mut messages: Vec<Message>) -> Result<ExitCode> {
    println!("{}", "💬 Interactive Chat Mode".green());
    ui::muted("Type \"exit\" or \"quit\" to end the conversation\n");

    let mut editor = DefaultEditor::new()
        .map_err(|e| SirError::InvalidInput(format!("cannot read input: {e}")))?;

    loop {
        let line = match editor.readline("You: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => {
                ui::error(format!("Error: {err}"));
                break;
            }
        };

        if is_exit_command(&line) {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(line.as_str());

        messages.push(Message::user(line));
        if let Some(reply) = send(adapter, &messages).await {
            messages.push(Message::assistant(reply));
        }
    }

    println!("{}", "\n👋 Goodbye!".yellow());
    Ok(0)
}
