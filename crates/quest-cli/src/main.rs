//! quest - AI-powered conversational search

mod api;
mod chat;
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use quest_search::SimulatedSources;
use quest_session::{ConversationStore, SearchOrchestrator};

/// quest - conversational search with cited answers
#[derive(Parser, Debug)]
#[command(name = "quest")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run the HTTP API server instead of the interactive chat
    #[arg(long)]
    serve: bool,

    /// Bind address for --serve mode
    #[arg(long)]
    addr: Option<String>,

    /// Bind port for --serve mode
    #[arg(short, long)]
    port: Option<u16>,

    /// Run a single search and exit
    #[arg(short, long)]
    query: Option<String>,

    /// Directory for persisted conversations
    #[arg(long)]
    data_dir: Option<String>,

    /// Initialize config file
    #[arg(long)]
    init_config: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup tracing
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("quest=debug")
            .init();
    }

    // Initialize config and exit
    if args.init_config {
        match config::Config::init() {
            Ok(path) => {
                println!("Config file created at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    // Load config file
    let cfg = config::Config::load();

    let sources = Arc::new(SimulatedSources::new());
    let completion = Arc::new(cfg.completion_client());

    // HTTP mode: the search routes are stateless, no store is opened.
    if args.serve {
        let addr = args
            .addr
            .or(cfg.server.addr.clone())
            .unwrap_or_else(|| "127.0.0.1".to_string());
        let port = args.port.or(cfg.server.port).unwrap_or(3030);
        let state = api::AppState::new(sources, completion, cfg.max_sources());
        return api::serve(&addr, port, state).await;
    }

    // Chat modes own the conversation store and the submission surface.
    let data_dir = args
        .data_dir
        .map(PathBuf::from)
        .unwrap_or_else(ConversationStore::data_dir);
    let store = Arc::new(ConversationStore::open(data_dir));
    let orchestrator =
        SearchOrchestrator::new(store, sources, completion).with_max_sources(cfg.max_sources());

    match args.query {
        Some(query) => chat::one_shot(&orchestrator, &query).await,
        None => chat::run(&orchestrator).await,
    }
}
