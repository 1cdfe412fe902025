// pwmsg — Application Entry Point
//
// Parses CLI arguments, initializes structured logging, and dispatches to the
// command handler. Passwords and messages are never logged.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pwmsg::cli::{execute, Cli};

#[tokio::main]
async fn main() {
    // RUST_LOG=pwmsg=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pwmsg=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
