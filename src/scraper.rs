//! Web scraping module for content extraction.
//!
//! Uses reqwest for fetching and scraper for HTML parsing.

use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use thiserror::Error;

/// User-Agent string identifying this scraper
const USER_AGENT: &str = concat!("suma/", env!("CARGO_PKG_VERSION"));

/// Timeout for HTTP requests
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Upper bound on extracted page text, applied before assembly
const MAX_TEXT_CHARS: usize = 60_000;

/// Elements whose text is never page content
const STRIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "aside",
];

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),
    #[error("no content found at URL")]
    NoContent,
}

/// Create a configured HTTP client for scraping
fn create_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
}

/// Fetch a URL and return its cleaned, boilerplate-stripped visible text.
///
/// Non-success statuses, timeouts, and connection failures all surface as
/// `ScraperError`; the caller decides how to render them.
pub async fn fetch_content(url: &str) -> Result<String, ScraperError> {
    let client = create_client()?;

    let response = client.get(url).send().await?.error_for_status()?;
    let html = response.text().await?;

    let document = Html::parse_document(&html);
    let text = extract_text(&document);

    if text.is_empty() {
        return Err(ScraperError::NoContent);
    }

    Ok(text)
}

/// Extract visible text, skipping boilerplate elements and collapsing all
/// whitespace runs (including newlines) into single spaces.
fn extract_text(document: &Html) -> String {
    let mut pieces: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let stripped = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| STRIPPED_TAGS.contains(&element.name()))
        });
        if !stripped {
            pieces.push(text);
        }
    }

    let joined = pieces.join(" ");
    let collapsed = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    bound_text(collapsed)
}

/// Cap extracted text at `MAX_TEXT_CHARS` characters
fn bound_text(text: String) -> String {
    match text.char_indices().nth(MAX_TEXT_CHARS) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_boilerplate_elements() {
        let html = Html::parse_document(
            "<html><head><title>t</title><style>p{color:red}</style>\
             <script>var a = 1;</script></head>\
             <body><nav>menu items</nav><header>masthead</header>\
             <p>Hello world</p><aside>related</aside>\
             <footer>copyright</footer></body></html>",
        );
        assert_eq!(extract_text(&html), "Hello world");
    }

    #[test]
    fn collapses_whitespace_runs() {
        let html = Html::parse_document(
            "<html><body><p>first   line</p>\n\n<p>second\t\tline</p></body></html>",
        );
        assert_eq!(extract_text(&html), "first line second line");
    }

    #[test]
    fn empty_page_yields_empty_text() {
        let html = Html::parse_document("<html><body><script>only();</script></body></html>");
        assert_eq!(extract_text(&html), "");
    }

    #[test]
    fn bounds_very_long_pages() {
        let body = "word ".repeat(20_000);
        let html = Html::parse_document(&format!("<html><body><p>{}</p></body></html>", body));
        assert!(extract_text(&html).chars().count() <= MAX_TEXT_CHARS);
    }
}
