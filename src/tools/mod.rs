//! Utility collaborators behind the command layer
//!
//! Each tool owns one concern (files, shell, download, search) and reports
//! failures through its own [`SirError`](crate::error::SirError) variant. None
//! of them print; presentation belongs to [`crate::commands`].

pub mod download;
pub mod file_ops;
pub mod search;
pub mod shell;

pub use self::{
    download::{DownloadReport, Downloader},
    file_ops::{FileOperation, FileOutcome},
    search::{SearchResult, WebSearch},
    shell::{ShellOutput, ShellRunner},
};
