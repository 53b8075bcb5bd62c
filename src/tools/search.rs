//! Web search by scraping the DuckDuckGo HTML endpoint
//!
//! Extraction is regex-based over the raw markup, not a DOM parse, so it is
//! best-effort: a markup change upstream yields the placeholder result.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SirError};
use crate::tools::download::BROWSER_USER_AGENT;

/// HTML search endpoint (no API key required)
pub const DUCKDUCKGO_HTML_URL: &str = "https://html.duckduckgo.com/html/";

/// Number of results when the caller does not ask for a count
pub const DEFAULT_RESULT_COUNT: usize = 5;

static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<a[^>]*class="result__a"[^>]*href="([^"]*)"[^>]*>(.*?)</a>"#)
        .expect("valid title regex")
});
static SNIPPET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<a[^>]*class="result__snippet"[^>]*>(.*?)</a>"#).expect("valid snippet regex")
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

const REDIRECT_PREFIX: &str = "//duckduckgo.com/l/?uddg=";

/// One search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl SearchResult {
    /// Result shown when nothing could be extracted from the page
    #[must_use]
    pub fn placeholder(query: &str) -> Self {
        Self {
            title: "Search completed".to_string(),
            url: format!("https://duckduckgo.com/?q={}", urlencoding::encode(query)),
            snippet: "Visit DuckDuckGo for full results".to_string(),
        }
    }
}

/// Search client
#[derive(Debug, Clone)]
pub struct WebSearch {
    client: Client,
    endpoint: String,
}

impl WebSearch {
    /// Create a client for the public DuckDuckGo endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new() -> Result<Self> {
        Self::with_endpoint(DUCKDUCKGO_HTML_URL)
    }

    /// Create a client for a specific HTML endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn with_endpoint(endpoint: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| SirError::Search(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    /// Search for `query`, returning at most `limit` results
    ///
    /// Never returns an empty list: when nothing parses, a single placeholder
    /// result pointing at DuckDuckGo is returned instead.
    ///
    /// # Errors
    ///
    /// Returns [`SirError::Search`] on transport failure or non-2xx status
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .header(header::USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
            .map_err(|e| SirError::Search(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SirError::Search(format!(
                "Request failed with status code {}",
                response.status().as_u16()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| SirError::Search(e.to_string()))?;

        let mut results = parse_results(&html, limit);
        debug!(query, found = results.len(), "parsed search results");
        if results.is_empty() {
            results.push(SearchResult::placeholder(query));
        }
        Ok(results)
    }
}

/// Extract up to `limit` results from DuckDuckGo result markup
///
/// Snippets are paired with titles in document order.
#[must_use]
pub fn parse_results(html: &str, limit: usize) -> Vec<SearchResult> {
    let mut snippets = SNIPPET_RE.captures_iter(html);
    let mut results = Vec::new();

    for caps in TITLE_RE.captures_iter(html) {
        if results.len() >= limit {
            break;
        }

        let raw_url = caps.get(1).map_or("", |m| m.as_str());
        let url = raw_url
            .strip_prefix(REDIRECT_PREFIX)
            .unwrap_or(raw_url)
            .split('&')
            .next()
            .unwrap_or_default();
        let title = strip_tags(caps.get(2).map_or("", |m| m.as_str()));

        let snippet = snippets
            .next()
            .and_then(|s| s.get(1))
            .map(|m| strip_tags(m.as_str()))
            .unwrap_or_default();

        if !url.is_empty() && !title.is_empty() {
            results.push(SearchResult {
                title: decode(&title),
                url: decode(url),
                snippet: decode(&snippet),
            });
        }
    }

    results
}

fn strip_tags(fragment: &str) -> String {
    TAG_RE.replace_all(fragment, "").trim().to_string()
}

/// Percent-decode, then unescape the common HTML entities
fn decode(text: &str) -> String {
    let decoded = urlencoding::decode(text).map_or_else(|_| text.to_string(), |s| s.into_owned());
    decoded
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
