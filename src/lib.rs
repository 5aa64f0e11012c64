//! # Suma
//!
//! Summarise and question webpages and documents using an LLM.
//!
//! ## Pipeline
//!
//! - **Fetch/read**: scrape a URL and/or extract text from `.txt`/`.pdf`/`.docx` files
//! - **Assemble**: merge everything into one bounded context string
//! - **Prompt**: one chat-completion request (summarise or answer a question)
//! - **Display**: the model's Markdown, or a rendered error, never a crash

pub mod actions;
pub mod agent;
pub mod config;
pub mod context;
pub mod reader;
pub mod scraper;
pub mod ui;

pub use config::Config;
