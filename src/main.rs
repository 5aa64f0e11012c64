//! Suma CLI - summarise and question webpages and documents
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use suma::{actions, context, ui, Config};

#[derive(Parser)]
#[command(name = "suma")]
#[command(version, about = "Summarise and question webpages and documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise a webpage and/or local documents
    Summarise {
        /// URL to fetch
        #[arg(long)]
        url: Option<String>,
        /// Document to include (.pdf, .txt, .docx); repeatable
        #[arg(long = "file")]
        files: Vec<PathBuf>,
        /// Show the raw assembled context instead of summarising
        #[arg(long)]
        raw: bool,
    },
    /// Answer a question about a webpage and/or local documents
    Ask {
        /// The question to answer
        question: String,
        /// URL to fetch
        #[arg(long)]
        url: Option<String>,
        /// Document to include (.pdf, .txt, .docx); repeatable
        #[arg(long = "file")]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Some(Commands::Summarise { url, files, raw }) => {
            let url = url.unwrap_or_default();
            if raw {
                let content = context::make_context(&url, &files).await;
                println!("{}", content);
                println!("\n--- {} characters of context ---", content.chars().count());
            } else {
                println!("{}", actions::on_summarize(&url, &files, &config).await);
            }
        }
        Some(Commands::Ask {
            question,
            url,
            files,
        }) => {
            let url = url.unwrap_or_default();
            println!("{}", actions::on_qa(&url, &files, &question, &config).await);
        }
        None => {
            // Default: launch the interactive panel
            ui::run(&config).await?;
        }
    }

    Ok(())
}
