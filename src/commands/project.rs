//! `project` - scaffold a whole project from a description
//!
//! The model is asked for a JSON file manifest. A reply that does not
//! contain one is shown as a plan instead of failing.

use std::path::{Component, Path, PathBuf};

use crossterm::style::Stylize;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{adapter_or_report, ui, ExitCode};
use crate::{
    config::ConfigStore,
    error::{Result, SirError},
    messages::Message,
    services::{ChatAdapter, ChatOptions},
    tools::file_ops::resolve_path,
};

/// Output budget for whole-project generation
const PROJECT_MAX_TOKENS: u32 = 8000;

const DEFAULT_PROJECT_TYPE: &str = "web";

const SYSTEM_PROMPT: &str = r#"You are an expert software architect and developer. Generate a complete project structure with all necessary files.
Return your response as a JSON object with this structure:
{
  "files": [
    {"path": "relative/path/to/file", "content": "file content here"},
    ...
  ]
}"#;

static JSON_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```json\n((?s:.*?))```").expect("valid json block regex"));
static JSON_OBJECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("valid json object regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// One file in the generated manifest
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectFile {
    pub path: String,
    pub content: String,
}

/// Default output directory: `./<description, lowercased, whitespace as '-'>`
#[must_use]
pub fn default_output_dir(description: &str) -> PathBuf {
    let slug = WHITESPACE_RE.replace_all(&description.to_lowercase(), "-").into_owned();
    PathBuf::from(".").join(slug)
}

#[must_use]
pub fn user_prompt(description: &str, project_type: Option<&str>) -> String {
    format!(
        "Create a {} project with the following description:\n\n{description}\n\nInclude all necessary files, configuration, and documentation.",
        project_type.unwrap_or(DEFAULT_PROJECT_TYPE)
    )
}

/// Locate the JSON manifest in a reply: a fenced `json` block, else the
/// outermost brace-delimited span
#[must_use]
pub fn extract_manifest(response: &str) -> Option<&str> {
    JSON_BLOCK_RE
        .captures(response)
        .and_then(|caps| caps.get(1))
        .or_else(|| JSON_OBJECT_RE.find(response))
        .map(|m| m.as_str())
}

/// Parse the manifest's `files` array
///
/// # Errors
///
/// Returns an error if the text is not JSON or `files` is missing or not an
/// array of `{path, content}` objects
pub fn parse_manifest(json: &str) -> Result<Vec<ProjectFile>> {
    let value: Value = serde_json::from_str(json)?;
    let files = value
        .get("files")
        .filter(|files| files.is_array())
        .cloned()
        .ok_or_else(|| SirError::InvalidInput("Invalid project structure in response".to_string()))?;
    Ok(serde_json::from_value(files)?)
}

/// Reject manifest paths that would land outside the project directory
fn relative_target(root: &Path, file: &ProjectFile) -> Result<PathBuf> {
    let relative = Path::new(&file.path);
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes || file.path.is_empty() {
        return Err(SirError::InvalidInput(format!(
            "refusing to write outside the project directory: {}",
            file.path
        )));
    }
    Ok(root.join(relative))
}

/// Write every manifest file under `root`, creating directories as needed
///
/// # Errors
///
/// Returns an error if a path escapes `root` or a write fails
pub async fn write_project(root: &Path, files: &[ProjectFile]) -> Result<()> {
    tokio::fs::create_dir_all(root).await?;
    for file in files {
        let target = relative_target(root, file)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &file.content).await?;
        ui::muted(format!("  ✓ Created: {}", file.path));
    }
    Ok(())
}

/// Run the project command
///
/// # Errors
///
/// Returns an error if the output directory cannot be resolved
pub async fn run(
    store: &ConfigStore,
    description: &str,
    project_type: Option<&str>,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let Some(adapter) = adapter_or_report(store, None, None) else {
        return Ok(1);
    };

    let output_dir = output.unwrap_or_else(|| default_output_dir(description));
    let messages = vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(user_prompt(description, project_type)),
    ];

    let spinner = ui::spinner("Generating project...");
    let result = adapter
        .chat(&messages, &ChatOptions::with_max_tokens(PROJECT_MAX_TOKENS))
        .await;
    spinner.finish_and_clear();

    let response = match result {
        Ok(response) => response,
        Err(err) => {
            ui::error(format!("Error: {err}"));
            return Ok(0);
        }
    };

    let Some(manifest) = extract_manifest(&response) else {
        println!("{}", "\n📦 Project Plan:\n".cyan());
        println!("{response}");
        println!();
        ui::warn("Unable to automatically generate files. Review the plan above.");
        return Ok(0);
    };

    let files = match parse_manifest(manifest) {
        Ok(files) => files,
        Err(err) => {
            ui::error(format!("Error: {err}"));
            return Ok(0);
        }
    };
    debug!(files = files.len(), dir = %output_dir.display(), "writing project");

    println!(
        "{}",
        format!("\n✨ Creating project in: {}\n", output_dir.display()).green()
    );

    if let Err(err) = write_project(&output_dir, &files).await {
        ui::error(format!("Error: {err}"));
        return Ok(0);
    }

    ui::success("Project created successfully!");
    ui::heading(format!("📁 Location: {}", resolve_path(&output_dir)?.display()));
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_output_dir() {
        assert_eq!(
            default_output_dir("My  Todo\tApp"),
            PathBuf::from("./my-todo-app")
        );
    }

    #[test]
    fn test_user_prompt_defaults_to_web() {
        assert!(user_prompt("blog", None).starts_with("Create a web project"));
        assert!(user_prompt("blog", Some("cli")).starts_with("Create a cli project"));
    }

    #[test]
    fn test_extract_manifest_prefers_fenced_block() {
        let reply = "Plan {not json}\n```json\n{\"files\": []}\n```\n";
        assert_eq!(extract_manifest(reply), Some("{\"files\": []}\n"));
    }

    #[test]
    fn test_extract_manifest_falls_back_to_braces() {
        let reply = "Sure! {\"files\": [{\"path\": \"a\", \"content\": \"b\"}]} Done.";
        assert_eq!(
            extract_manifest(reply),
            Some("{\"files\": [{\"path\": \"a\", \"content\": \"b\"}]}")
        );
        assert!(extract_manifest("no json here").is_none());
    }

    #[test]
    fn test_parse_manifest() {
        let files =
            parse_manifest(r#"{"files": [{"path": "src/main.rs", "content": "fn main() {}"}]}"#)
                .unwrap();
        assert_eq!(
            files,
            vec![ProjectFile {
                path: "src/main.rs".to_string(),
                content: "fn main() {}".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_manifest_invalid_structure() {
        assert!(matches!(
            parse_manifest(r#"{"files": "nope"}"#),
            Err(SirError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_manifest(r#"{"other": []}"#),
            Err(SirError::InvalidInput(_))
        ));
        assert!(matches!(parse_manifest("{broken"), Err(SirError::Json(_))));
    }

    #[tokio::test]
    async fn test_write_project() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("demo");
        let files = vec![
            ProjectFile {
                path: "README.md".to_string(),
                content: "# demo".to_string(),
            },
            ProjectFile {
                path: "src/lib.rs".to_string(),
                content: "pub fn x() {}".to_string(),
            },
        ];

        write_project(&root, &files).await.unwrap();
        assert_eq!(std::fs::read_to_string(root.join("README.md")).unwrap(), "# demo");
        assert_eq!(
            std::fs::read_to_string(root.join("src/lib.rs")).unwrap(),
            "pub fn x() {}"
        );
    }

    #[tokio::test]
    async fn test_write_project_rejects_escaping_paths() {
        let dir = TempDir::new().unwrap();
        let files = vec![ProjectFile {
            path: "../escape.txt".to_string(),
            content: "x".to_string(),
        }];

        assert!(write_project(&dir.path().join("p"), &files).await.is_err());
        assert!(!dir.path().join("escape.txt").exists());
    }
}
