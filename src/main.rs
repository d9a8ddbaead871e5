//! codecoach - in-page coding assistant, bench edition
//!
//! Loads a saved snapshot of a coding-problem page and runs the chat
//! session engine against it interactively. The REPL stands in for the
//! in-page rendering boundary.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

use codecoach::config::Config;
use codecoach::credentials::MemoryCredentialStore;
use codecoach::extractor::DomExtractor;
use codecoach::provider::CompletionClient;
use codecoach::repl::Repl;
use codecoach::session::ChatSession;

#[derive(Parser)]
#[command(name = "codecoach")]
#[command(about = "Chat about a coding problem page with an LLM")]
struct Args {
    /// Saved HTML snapshot of the problem page
    #[arg(long, short = 'p')]
    page: std::path::PathBuf,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY")]
    openai_api_key: Option<String>,

    /// Completion endpoint base URL
    #[arg(long, env = "OPENAI_BASE_URL")]
    openai_base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (from ~/.codecoach/.env or current dir)
    let env_path = dirs::home_dir()
        .map(|h| h.join(".codecoach").join(".env"))
        .filter(|p| p.exists());
    if let Some(path) = env_path {
        let _ = dotenvy::from_path(&path);
    } else {
        let _ = dotenvy::dotenv();
    }

    // Initialize logging
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Load config file (~/.codecoach/config.toml)
    let config = Config::load();

    // Resolve values: CLI args > env vars (handled by clap) > config file
    let api_key = args.openai_api_key.or(config.openai_api_key.clone());

    let html = std::fs::read_to_string(&args.page)
        .with_context(|| format!("failed to read page snapshot {}", args.page.display()))?;
    let extractor = DomExtractor::new(html, &config.selectors())?;

    let client = match args.openai_base_url.or(config.openai_base_url.clone()) {
        Some(base) => CompletionClient::with_base_url(base),
        None => CompletionClient::new(),
    };

    // Credentials live in-memory for the bench; /key updates them mid-run
    let credentials = Arc::new(MemoryCredentialStore::new(api_key));

    let session = ChatSession::new(Box::new(extractor), credentials.clone(), client);

    println!();
    println!("  codecoach {}", env!("CARGO_PKG_VERSION"));
    println!("  Page: {}", args.page.display());
    println!();

    let mut repl = Repl::new(session, credentials)?;
    repl.run().await
}
