//! Command handlers
//!
//! Each handler validates its arguments, calls one collaborator (an AI
//! adapter, the config store, or a tool) and prints the result. Handlers
//! return the process exit code; only unexpected failures bubble up as errors.

pub mod chat;
pub mod code;
pub mod config;
pub mod download;
pub mod execute;
pub mod file;
pub mod project;
pub mod search;
pub mod ui;

use crate::{
    cli::Commands,
    config::{ConfigStore, ProviderKind},
    error::{Result, SirError},
    services::{resolve_adapter, Adapter},
};

/// Process exit code returned by a command
pub type ExitCode = i32;

/// Route a parsed command to its handler
///
/// # Errors
///
/// Returns an error only for failures the handler does not report itself
pub async fn dispatch(command: Commands, store: &mut ConfigStore) -> Result<ExitCode> {
    match command {
        Commands::Chat {
            message,
            model,
            provider,
            system,
        } => {
            chat::run(
                store,
                chat::ChatArgs {
                    message,
                    model,
                    provider,
                    system,
                },
            )
            .await
        }
        Commands::Code {
            prompt,
            language,
            file,
            output,
        } => {
            code::run(
                store,
                code::CodeArgs {
                    prompt,
                    language,
                    file,
                    output,
                },
            )
            .await
        }
        Commands::Project {
            description,
            project_type,
            output,
        } => project::run(store, &description, project_type.as_deref(), output).await,
        Commands::File {
            operation,
            path,
            content,
        } => file::run(&operation, &path, content.as_deref()).await,
        Commands::Search { query, num } => search::run(&query, num).await,
        Commands::Download { url, output } => download::run(&url, output.as_deref()).await,
        Commands::Execute {
            command,
            shell,
            dir,
        } => execute::run(&command, &shell, dir.as_deref()).await,
        Commands::Config { action, key, value } => {
            config::run(store, &action, key.as_deref(), value.as_deref())
        }
    }
}

/// Build the adapter for a command from stored credentials
///
/// The provider defaults to `defaultProvider`, the model to
/// `defaultModels.<provider>` and then to the vendor default.
///
/// # Errors
///
/// Returns [`SirError::UnknownProvider`] or [`SirError::MissingApiKey`]
pub fn adapter_from_config(
    store: &ConfigStore,
    provider: Option<&str>,
    model: Option<&str>,
) -> Result<Adapter> {
    let provider = provider.map_or_else(|| store.default_provider(), str::to_string);
    let kind: ProviderKind = provider.parse()?;

    let api_key = store
        .api_key(kind.id())
        .ok_or_else(|| SirError::MissingApiKey {
            provider: kind.id().to_string(),
        })?;
    let model = model.or_else(|| store.default_model(kind.id()));

    resolve_adapter(kind.id(), api_key, model)
}

/// Resolve an adapter or print why not; `None` means exit with status 1
pub(crate) fn adapter_or_report(
    store: &ConfigStore,
    provider: Option<&str>,
    model: Option<&str>,
) -> Option<Adapter> {
    match adapter_from_config(store, provider, model) {
        Ok(adapter) => Some(adapter),
        Err(SirError::MissingApiKey { provider }) => {
            ui::error(format!("No API key found for provider: {provider}"));
            ui::error_hint(format!("Run: sircli config set apiKeys.{provider} YOUR_API_KEY"));
            None
        }
        Err(err) => {
            ui::error(err.to_string());
            if matches!(err, SirError::UnknownProvider(_)) {
                let known: Vec<&str> = ProviderKind::ALL.iter().map(|k| k.id()).collect();
                ui::error_hint(format!("Available providers: {}", known.join(", ")));
            }
            None
        }
    }
}
