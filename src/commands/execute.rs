//! `execute` - run a shell command and propagate its exit code

use std::path::Path;

use crossterm::style::Stylize;

use super::{ui, ExitCode};
use crate::{error::Result, tools::shell::ShellRunner};

/// Run the execute command
///
/// # Errors
///
/// Never fails; spawn errors are printed and mapped to exit code 1
pub async fn run(command: &str, shell: &str, dir: Option<&Path>) -> Result<ExitCode> {
    ui::heading(format!("⚡ Executing: {command}\n"));

    let output = match ShellRunner::new(Some(shell), dir) {
        Ok(runner) => runner.run(command).await,
        Err(err) => Err(err),
    };
    let output = match output {
        Ok(output) => output,
        Err(err) => {
            ui::error(format!("Error: {err}"));
            return Ok(1);
        }
    };

    if output.success() {
        if !output.stdout.is_empty() {
            println!("{}", output.stdout);
        }
        if !output.stderr.is_empty() {
            eprintln!("{}", output.stderr.as_str().yellow());
        }
        ui::success("Command completed successfully");
        return Ok(0);
    }

    let code = output.failure_code();
    ui::error(format!("Command failed with exit code {code}"));
    if !output.stdout.is_empty() {
        println!("{}", "\nStdout:".yellow());
        println!("{}", output.stdout);
    }
    if !output.stderr.is_empty() {
        eprintln!("{}", "\nStderr:".red());
        eprintln!("{}", output.stderr);
    }
    Ok(code)
}
