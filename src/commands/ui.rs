//! Terminal presentation helpers shared by the commands

use std::time::Duration;

use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};

pub fn success(msg: impl AsRef<str>) {
    println!("{}", format!("✅ {}", msg.as_ref()).green());
}

pub fn error(msg: impl AsRef<str>) {
    eprintln!("{}", format!("❌ {}", msg.as_ref()).red());
}

pub fn warn(msg: impl AsRef<str>) {
    println!("{}", format!("⚠️  {}", msg.as_ref()).yellow());
}

/// Yellow follow-up line, e.g. the command that fixes an error
pub fn hint(msg: impl AsRef<str>) {
    println!("{}", msg.as_ref().yellow());
}

/// Yellow follow-up to an error, kept on stderr next to it
pub fn error_hint(msg: impl AsRef<str>) {
    eprintln!("{}", msg.as_ref().yellow());
}

pub fn heading(msg: impl AsRef<str>) {
    println!("{}", msg.as_ref().cyan());
}

pub fn muted(msg: impl AsRef<str>) {
    println!("{}", msg.as_ref().dark_grey());
}

/// Start a steady spinner with a message
pub fn spinner(msg: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
