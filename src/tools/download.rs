//! HTTP download streamed to disk with progress callbacks

use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::{header, Client, Url};
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info};

use crate::error::{Result, SirError};

/// Browser-like agent; some hosts refuse unknown clients
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

/// File name used when the URL path has no usable last segment
pub const FALLBACK_FILE_NAME: &str = "download";

/// Progress callback, called with (`downloaded_bytes`, `total_bytes` if known)
pub type ProgressCallback<'a> = &'a (dyn Fn(u64, Option<u64>) + Send + Sync);

/// Result of a finished download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    pub path: PathBuf,
    pub bytes: u64,
}

impl DownloadReport {
    /// Size in megabytes with two decimals
    #[must_use]
    pub fn size_mb(&self) -> String {
        #[allow(clippy::cast_precision_loss)]
        let mb = self.bytes as f64 / (1024.0 * 1024.0);
        format!("{mb:.2}")
    }
}

/// Percent complete with one decimal
#[must_use]
pub fn percent(downloaded: u64, total: u64) -> String {
    if total == 0 {
        return "0.0".to_string();
    }
    #[allow(clippy::cast_precision_loss)]
    let pct = downloaded as f64 / total as f64 * 100.0;
    format!("{pct:.1}")
}

/// Output file name for a URL: explicit choice, else last path segment
///
/// The decoded segment is reduced to its final component, so encoded
/// separators such as `..%2F` cannot move the file out of the directory.
#[must_use]
pub fn output_name(url: &Url, output: Option<&str>) -> String {
    if let Some(name) = output.filter(|o| !o.is_empty()) {
        return name.to_string();
    }
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .map(|segment| {
            urlencoding::decode(segment).map_or_else(|_| segment.to_string(), |s| s.into_owned())
        })
        .and_then(|decoded| {
            Path::new(&decoded)
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}

/// Streams HTTP responses to files
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
}

impl Downloader {
    /// Create a downloader
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(|e| SirError::Download(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Download `url` to `destination`, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns [`SirError::Download`] on transport failure, non-2xx status or
    /// a write error
    pub async fn download(
        &self,
        url: &str,
        destination: &Path,
        progress: ProgressCallback<'_>,
    ) -> Result<DownloadReport> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SirError::Download(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SirError::Download(format!(
                "Request failed with status code {}",
                response.status().as_u16()
            )));
        }

        let total = response
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&len| len > 0);
        debug!(url, ?total, "download started");

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| SirError::Download(format!("{}: {e}", parent.display())))?;
        }
        let mut file = fs::File::create(destination)
            .await
            .map_err(|e| SirError::Download(format!("{}: {e}", destination.display())))?;

        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| SirError::Download(e.to_string()))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| SirError::Download(e.to_string()))?;
            downloaded += chunk.len() as u64;
            progress(downloaded, total);
        }
        file.flush()
            .await
            .map_err(|e| SirError::Download(e.to_string()))?;

        let bytes = fs::metadata(destination).await?.len();
        info!(path = %destination.display(), bytes, "download complete");

        Ok(DownloadReport {
            path: destination.to_path_buf(),
            bytes,
        })
    }
}
