//! `download` - fetch a URL to disk with a progress spinner

use std::path::Path;

use reqwest::Url;

use super::{ui, ExitCode};
use crate::{
    error::{Result, SirError},
    tools::{
        download::{output_name, percent, DownloadReport, Downloader},
        file_ops::resolve_path,
    },
};

/// Run the download command
///
/// # Errors
///
/// Never fails; download errors are printed and mapped to exit code 1
pub async fn run(url: &str, output: Option<&str>) -> Result<ExitCode> {
    match fetch(url, output).await {
        Ok(report) => {
            ui::success(format!("Downloaded: {}", report.path.display()));
            ui::muted(format!("   Size: {} MB", report.size_mb()));
            Ok(0)
        }
        Err(err) => {
            ui::error(format!("Download failed: {err}"));
            Ok(1)
        }
    }
}

async fn fetch(url: &str, output: Option<&str>) -> Result<DownloadReport> {
    let parsed = Url::parse(url).map_err(|e| SirError::Download(format!("Invalid URL: {e}")))?;
    let name = output_name(&parsed, output);
    let destination = resolve_path(Path::new(&name))?;

    let downloader = Downloader::new()?;

    let spinner = ui::spinner(format!("Downloading {name}..."));
    let progress = |done: u64, total: Option<u64>| match total {
        Some(total) => spinner.set_message(format!("Downloading {name}... {}%", percent(done, total))),
        None => spinner.set_message(format!("Downloading {name}... {done} bytes")),
    };

    let result = downloader
        .download(parsed.as_str(), &destination, &progress)
        .await;
    spinner.finish_and_clear();
    result
}
