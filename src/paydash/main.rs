//! # Paydash CLI
//!
//! The binary is intentionally thin: the CLI lives in `cli/`, while this file
//! only starts the runtime, invokes `cli::run()` and handles process
//! termination.
//!
//! Everything the dashboard does sits in the library. The CLI parses either
//! one command from the shell arguments or, with no command, a stream of
//! commands from stdin, drives a [`paydash::dashboard::Dashboard`] with them
//! and renders what comes back.
//!
//! The runtime is single-threaded. Data calls suspend for their simulated
//! latency and the session waits on each one before reading the next line.

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
