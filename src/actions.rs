//! Interaction controller: the two entry points the UI surfaces call.
//!
//! Both are total functions. Whatever goes wrong underneath, the caller gets a
//! displayable string back, never a panic or a propagated error.

use crate::agent::{self, AgentError};
use crate::config::Config;
use crate::context;
use std::path::PathBuf;

/// Shown when the Q&A action is triggered without a question
pub const EMPTY_QUESTION_PROMPT: &str = "Please enter a question.";

/// Assemble context from the inputs and summarise it
pub async fn on_summarize(url: &str, files: &[PathBuf], config: &Config) -> String {
    let content = context::make_context(url, files).await;
    match agent::summarize(&content, config).await {
        Ok(markdown) => markdown,
        Err(e) => render_error(&e),
    }
}

/// Assemble context from the inputs and answer the question from it.
///
/// A blank question short-circuits before any fetch, read, or model call.
pub async fn on_qa(url: &str, files: &[PathBuf], question: &str, config: &Config) -> String {
    let question = question.trim();
    if question.is_empty() {
        return EMPTY_QUESTION_PROMPT.to_string();
    }

    let content = context::make_context(url, files).await;
    match agent::answer(&content, question, config).await {
        Ok(markdown) => markdown,
        Err(e) => render_error(&e),
    }
}

/// The single place model-call failures become display text
fn render_error(err: &AgentError) -> String {
    format!("**Error:** {}: {}", err.kind(), err)
}
