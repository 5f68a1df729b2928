//! Quorum CLI
//!
//! Starts the Quorum HTTP server.

use quorum_server::{config::ServerConfig, start_server, ServerError};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let args: Vec<String> = env::args().collect();

    if args.iter().skip(1).any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let config = ServerConfig::from_env()?;
    start_server(config).await
}

fn print_help() {
    println!("Quorum - decision cards from meeting transcripts");
    println!();
    println!("USAGE:");
    println!("    quorum");
    println!();
    println!("OPTIONS:");
    println!("    --help             Print this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    QUORUM_CONFIG        Path to a TOML config file");
    println!("    PORT                 Port to listen on (default: 8000)");
    println!("    QUORUM_STATIC_ROOT   Directory of static assets (default: public)");
    println!("    RUST_LOG             Log filter (default: info)");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain:");
    println!("    - bind_address: IP address to bind (default: '127.0.0.1')");
    println!("    - port: Port number (default: 8000)");
    println!("    - static_root: Directory served for non-API paths");
    println!("    - [pipeline]: per-stage latencies in milliseconds");
    println!("    - [extractor]: confidence base, words_per_step, floor, ceiling");
    println!();
}
