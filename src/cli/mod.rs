//! CLI argument parsing and command routing

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::tools::{search::DEFAULT_RESULT_COUNT, shell::DEFAULT_SHELL};

/// SirCLI: AI-powered command-line assistant
#[derive(Debug, Parser)]
#[command(name = "sircli")]
#[command(about = "SirCLI - AI-powered command-line assistant", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Chat with an AI model (interactive when no message is given)
    Chat {
        /// Message to send
        message: Option<String>,

        /// AI model to use (gpt-4, claude-3-5-sonnet-20241022, gemini-pro, ...)
        #[arg(short, long)]
        model: Option<String>,

        /// AI provider (openai, anthropic, google, openrouter, groq)
        #[arg(short, long)]
        provider: Option<String>,

        /// System prompt
        #[arg(short, long)]
        system: Option<String>,
    },

    /// Generate or modify code
    Code {
        /// Code generation prompt
        prompt: String,

        /// Programming language
        #[arg(short, long)]
        language: Option<String>,

        /// File to modify
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create an entire project from a description
    Project {
        /// Project description
        description: String,

        /// Project type (web, cli, api, ...)
        #[arg(short = 't', long = "type")]
        project_type: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// File operations (create, read, write, append, delete, mkdir, list)
    File {
        /// Operation to perform
        operation: String,

        /// File path
        path: PathBuf,

        /// Content for write/append operations
        content: Option<String>,
    },

    /// Search the internet
    Search {
        /// Search query
        query: String,

        /// Number of results
        #[arg(short = 'n', long, default_value_t = DEFAULT_RESULT_COUNT)]
        num: usize,
    },

    /// Download a file from the internet
    Download {
        /// URL to download
        url: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Execute a shell command
    Execute {
        /// Command to execute
        command: String,

        /// Shell to use
        #[arg(short, long, default_value = DEFAULT_SHELL)]
        shell: String,

        /// Working directory
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Configure API keys and settings (set, get, delete, list)
    Config {
        /// Action: set, get, delete, list
        action: String,

        /// Configuration key (dotted path, e.g. apiKeys.openai)
        key: Option<String>,

        /// Configuration value
        value: Option<String>,
    },
}

impl Cli {
    /// Parse CLI arguments from environment
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
