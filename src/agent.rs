//! Prompting engine: turns assembled context into a single chat-completion
//! request and returns the model's Markdown verbatim.
//!
//! One request per operation. No retries, no streaming, no conversation
//! history. Failures propagate as `AgentError`; rendering them is the
//! controller's job.

use crate::config::Config;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Character budget applied to context before it is embedded in a prompt.
/// Truncation is a silent prefix take.
pub const MAX_CONTEXT_CHARS: usize = 12_000;

const SYSTEM_SUMMARY: &str = "You are a concise, slightly snarky assistant. \
    Summarize the provided content, ignoring boilerplate navigation. \
    Respond in Markdown without code fences.";

const SYSTEM_QA: &str = "You answer questions strictly using the provided content. \
    If the answer is not present, say 'I don't know based on the provided content.' \
    Respond concisely in Markdown.";

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("LLM request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("LLM returned no choices")]
    EmptyResponse,
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl AgentError {
    /// Short variant name used when rendering errors for display
    pub fn kind(&self) -> &'static str {
        match self {
            AgentError::RequestFailed(_) => "RequestFailed",
            AgentError::EmptyResponse => "EmptyResponse",
            AgentError::Config(_) => "Config",
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Summarise the context; returns the model's Markdown verbatim
pub async fn summarize(content: &str, config: &Config) -> Result<String, AgentError> {
    let user = summary_prompt(content);
    chat(config, SYSTEM_SUMMARY, &user).await
}

/// Answer a question strictly from the context; returns the model's Markdown
/// verbatim
pub async fn answer(content: &str, question: &str, config: &Config) -> Result<String, AgentError> {
    let user = qa_prompt(content, question);
    chat(config, SYSTEM_QA, &user).await
}

/// Build the summarisation user prompt around the truncated context
pub fn summary_prompt(content: &str) -> String {
    format!("Summarize this:\n\n{}", truncate_context(content))
}

/// Build the Q&A user prompt embedding both context and question
pub fn qa_prompt(content: &str, question: &str) -> String {
    format!(
        "Context:\n{}\n\nQuestion: {}",
        truncate_context(content),
        question
    )
}

/// Prefix-take the first `MAX_CONTEXT_CHARS` characters, char-boundary safe
fn truncate_context(content: &str) -> &str {
    match content.char_indices().nth(MAX_CONTEXT_CHARS) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

/// Issue one chat-completion request and return the first choice's text.
/// The fetch path has its own timeout; the model call deliberately relies on
/// the provider closing the connection.
async fn chat(config: &Config, system: &str, user: &str) -> Result<String, AgentError> {
    let api_key = config.api_key()?;
    let client = Client::builder().build()?;

    let request = ChatRequest {
        model: &config.agent.model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: user,
            },
        ],
    };

    let response = client
        .post(format!("{}/chat/completions", config.agent.api_base))
        .bearer_auth(api_key)
        .json(&request)
        .send()
        .await?
        .error_for_status()?;

    let parsed: ChatResponse = response.json().await?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(AgentError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AgentConfig, ApiConfig, Config};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    #[test]
    fn truncation_caps_at_budget() {
        let long = "a".repeat(MAX_CONTEXT_CHARS + 1_000);
        assert_eq!(truncate_context(&long).len(), MAX_CONTEXT_CHARS);

        let short = "short content";
        assert_eq!(truncate_context(short), short);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let long = "é".repeat(MAX_CONTEXT_CHARS + 50);
        let truncated = truncate_context(&long);
        assert_eq!(truncated.chars().count(), MAX_CONTEXT_CHARS);
    }

    #[test]
    fn summary_prompt_has_fixed_prefix() {
        let prompt = summary_prompt("The sky is blue.");
        assert_eq!(prompt, "Summarize this:\n\nThe sky is blue.");
    }

    #[test]
    fn qa_prompt_embeds_context_and_question() {
        let prompt = qa_prompt("The sky is blue.", "What colour is the sky?");
        assert!(prompt.starts_with("Context:\nThe sky is blue."));
        assert!(prompt.ends_with("Question: What colour is the sky?"));
    }

    /// Minimal one-shot HTTP stub: accepts a single connection, captures the
    /// request, replies with the given JSON body.
    async fn spawn_stub(body: String) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text
                        .lines()
                        .find_map(|l| l.to_lowercase().strip_prefix("content-length:").map(str::to_owned))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
        });

        (format!("http://{}/v1", addr), rx)
    }

    fn stub_config(api_base: String) -> Config {
        Config {
            agent: AgentConfig {
                model: "gpt-4.1-mini".to_string(),
                api_base,
            },
            api: ApiConfig {
                openai_key: Some("sk-test".to_string()),
            },
        }
    }

    #[tokio::test]
    async fn summarize_forwards_prompt_and_returns_first_choice() {
        let reply = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "A short summary."}}]
        });
        let (api_base, captured) = spawn_stub(reply.to_string()).await;
        let config = stub_config(api_base);

        let result = summarize("The sky is blue.", &config).await.unwrap();
        assert_eq!(result, "A short summary.");

        let request = captured.await.unwrap();
        assert!(request.contains("POST /v1/chat/completions"));
        assert!(request.contains("Bearer sk-test"));

        let body = request.split("\r\n\r\n").nth(1).unwrap();
        let sent: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(sent["model"], "gpt-4.1-mini");
        assert_eq!(sent["messages"][0]["role"], "system");
        assert_eq!(sent["messages"][1]["role"], "user");
        assert_eq!(
            sent["messages"][1]["content"],
            "Summarize this:\n\nThe sky is blue."
        );
    }

    #[tokio::test]
    async fn empty_choices_is_a_typed_error() {
        let (api_base, _captured) = spawn_stub(r#"{"choices":[]}"#.to_string()).await;
        let config = stub_config(api_base);

        let err = answer("context", "question?", &config).await.unwrap_err();
        assert!(matches!(err, AgentError::EmptyResponse));
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let config = Config::default();
        let err = summarize("anything", &config).await.unwrap_err();
        assert!(matches!(err, AgentError::Config(_)));
    }
}
