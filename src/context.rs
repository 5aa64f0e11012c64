//! Context assembly: merge fetched URL text and extracted file texts into the
//! single string handed to the prompting engine.
//!
//! The lower layers return typed errors; this module is where per-source
//! failures are rendered inline so that one bad input never aborts the batch.

use crate::reader;
use crate::scraper;
use std::path::{Path, PathBuf};

/// Returned when neither a URL nor any files were supplied. Sent to the model
/// as-is; the model will tell the user what to do.
pub const NO_CONTENT_SENTINEL: &str =
    "[No content provided. Enter a URL or upload a document.]";

/// Build the combined context from an optional URL and a list of files.
///
/// Infallible by contract: fetch and read failures become bracketed inline
/// markers in the assembled text, and the absence of any input yields the
/// fixed sentinel rather than an empty string.
pub async fn make_context(url: &str, files: &[PathBuf]) -> String {
    let mut parts: Vec<String> = Vec::new();

    let url = url.trim();
    if !url.is_empty() {
        match scraper::fetch_content(url).await {
            Ok(text) => parts.push(text),
            Err(e) => parts.push(format!("[Error fetching URL: {}]", e)),
        }
    }

    let file_text = collect_files_text(files);
    if !file_text.is_empty() {
        parts.push(file_text);
    }

    if parts.is_empty() {
        return NO_CONTENT_SENTINEL.to_string();
    }
    parts.join("\n\n")
}

/// Extract text from each file independently, in caller order, joined by blank
/// lines. A file that fails to read contributes an inline error marker.
fn collect_files_text(files: &[PathBuf]) -> String {
    let texts: Vec<String> = files
        .iter()
        .map(|path| match reader::read_any_file(path) {
            Ok(text) => text,
            Err(e) => format!("[Error reading {}: {}]", display_name(path), e),
        })
        .collect();
    texts.join("\n\n")
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn no_input_yields_sentinel() {
        assert_eq!(make_context("", &[]).await, NO_CONTENT_SENTINEL);
    }

    #[tokio::test]
    async fn blank_url_counts_as_absent() {
        assert_eq!(make_context("   ", &[]).await, NO_CONTENT_SENTINEL);
    }

    #[tokio::test]
    async fn fetch_failure_becomes_inline_marker() {
        // An unsupported scheme fails inside reqwest without touching the network
        let context = make_context("htp://malformed", &[]).await;
        assert!(context.starts_with("[Error fetching URL:"));
    }

    #[tokio::test]
    async fn files_aggregate_in_order_with_inline_errors() {
        let dir = tempfile::tempdir().unwrap();
        let good_a = dir.path().join("a.txt");
        let bad = dir.path().join("b.csv");
        let good_c = dir.path().join("c.txt");
        for (path, content) in [(&good_a, "alpha"), (&bad, "1,2,3"), (&good_c, "omega")] {
            std::fs::File::create(path)
                .unwrap()
                .write_all(content.as_bytes())
                .unwrap();
        }

        let context = make_context("", &[good_a, bad, good_c]).await;

        let alpha = context.find("alpha").unwrap();
        let error = context.find("[Error reading b.csv:").unwrap();
        let omega = context.find("omega").unwrap();
        assert!(alpha < error && error < omega, "parts out of order: {context}");
    }

    #[tokio::test]
    async fn file_text_flows_through_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sky.txt");
        std::fs::write(&path, "The sky is blue.").unwrap();

        assert_eq!(make_context("", &[path]).await, "The sky is blue.");
    }
}
