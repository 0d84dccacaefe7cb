//! Board DRC server: line-delimited JSON-RPC over stdin/stdout
//!
//! Logs go to stderr, filtered by `RUST_LOG` (e.g. `RUST_LOG=board_drc=debug`).

use board_drc::server;
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    info!("[Server] Starting board DRC server...");
    let stdin = io::BufReader::new(io::stdin());
    let mut stdout = io::stdout();
    server::serve(stdin, &mut stdout)
}
