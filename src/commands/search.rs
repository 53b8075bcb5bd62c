//! `search` - web search via DuckDuckGo's HTML endpoint

use crossterm::style::Stylize;

use super::{ui, ExitCode};
use crate::{
    error::Result,
    tools::search::{SearchResult, WebSearch, DEFAULT_RESULT_COUNT},
};

/// Run the search command; failures are printed but still exit 0
///
/// # Errors
///
/// Never fails
pub async fn run(query: &str, num: usize) -> Result<ExitCode> {
    let limit = if num == 0 { DEFAULT_RESULT_COUNT } else { num };

    let spinner = ui::spinner("Searching...");
    let results = match WebSearch::new() {
        Ok(search) => search.search(query, limit).await,
        Err(err) => Err(err),
    };
    spinner.finish_and_clear();

    match results {
        Ok(results) => print_results(query, &results),
        Err(err) => {
            ui::error(format!("Error: {err}"));
            ui::hint("Note: Web search requires internet connection");
        }
    }
    Ok(0)
}

fn print_results(query: &str, results: &[SearchResult]) {
    ui::heading(format!("\n🔍 Search Results for: \"{query}\"\n"));
    for (i, result) in results.iter().enumerate() {
        println!("{}", format!("{}. {}", i + 1, result.title).bold());
        println!("   {}", result.url.as_str().blue());
        if !result.snippet.is_empty() {
            ui::muted(format!("   {}", result.snippet));
        }
        println!();
    }
}
