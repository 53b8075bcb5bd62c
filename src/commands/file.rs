//! `file` - single-path file operations

use std::path::Path;

use super::{ui, ExitCode};
use crate::{
    error::Result,
    tools::file_ops::{self, FileOperation, FileOutcome},
};

/// Run the file command
///
/// # Errors
///
/// Never fails; filesystem errors are printed and mapped to exit code 1
pub async fn run(operation: &str, path: &Path, content: Option<&str>) -> Result<ExitCode> {
    let operation: FileOperation = match operation.parse() {
        Ok(op) => op,
        Err(err) => {
            ui::error(err.to_string());
            ui::hint(format!(
                "Available operations: {}",
                FileOperation::NAMES.join(", ")
            ));
            return Ok(1);
        }
    };

    match file_ops::run(operation, path, content).await {
        Ok(outcome) => {
            report(&outcome);
            Ok(0)
        }
        Err(err) => {
            ui::error(format!("Error: {err}"));
            Ok(1)
        }
    }
}

fn report(outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Read { content, .. } => {
            ui::heading(format!("\n📄 {outcome}:\n"));
            println!("{content}");
        }
        FileOutcome::Listed { entries, .. } => {
            ui::heading(format!("\n📁 {outcome}:\n"));
            for entry in entries {
                println!("  {entry}");
            }
        }
        _ => ui::success(outcome.to_string()),
    }
}
