//! MCP server for an in-memory document set.
//!
//! Run with `doc-mcp` for the built-in documents or `doc-mcp --seed docs.json`.

use std::path::PathBuf;

use clap::Parser;
use doc_mcp::{DocumentStore, McpServer};
use tracing_subscriber::EnvFilter;

/// MCP server for an in-memory document set.
///
/// Exposes document tools, resources and prompts to AI agents.
/// Communicates via JSON-RPC 2.0 over stdin/stdout.
#[derive(Parser)]
#[command(name = "doc-mcp")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file with an object of document id to content.
    /// Replaces the built-in documents. Never written back.
    #[arg(long, value_name = "PATH")]
    seed: Option<PathBuf>,

    /// Enable debug logging to stderr.
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    // Set up logging
    if args.verbose {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("doc_mcp=debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let store = match &args.seed {
        Some(path) => match DocumentStore::from_json_file(path) {
            Ok(store) => store,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => DocumentStore::seeded(),
    };
    tracing::info!(documents = store.len(), "document store ready");

    let mut server = McpServer::new(store);

    if let Err(e) = server.run().await {
        eprintln!("Error: Server error: {}", e);
        std::process::exit(1);
    }
}
