//! Fetch command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use streetlens_core::SubmissionClient;
use tracing::info;

/// Download a historical image by its archive path and write it to disk.
pub async fn execute(path: String, output: Option<PathBuf>, api_url: Option<String>) -> Result<()> {
    let client = SubmissionClient::new(super::client_config(api_url)?)?;

    let url = client.resolve(&path)?;
    let bytes = client.fetch_historical(&url).await?;

    let out = match output {
        Some(out) => out,
        None => default_output(&url),
    };
    std::fs::write(&out, &bytes).with_context(|| format!("Failed to write {}", out.display()))?;
    info!(path = %out.display(), bytes = bytes.len(), "historical image saved");

    println!("{}", "Historical image downloaded.".green());
    println!("   {} {}", "Saved:".dimmed(), out.display());
    Ok(())
}

/// Last URL path segment, or a fixed fallback name.
fn default_output(url: &url::Url) -> PathBuf {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("historical.jpg"))
}
