//! # CLI Behavior
//!
//! This is **one possible UI client** for paydash, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and output formatting.
//!
//! ## One-Shot and Interactive
//!
//! `paydash list`, `paydash add --name ...` and friends run a single command
//! against a fresh session and exit. Selection and the open form do not
//! survive between such runs; only the stored records do.
//!
//! `paydash` with no command starts an interactive session. Each stdin line is
//! one command in the same grammar (`select 1-3`, `action`, `save --rate 90`),
//! so selection, search, paging and the form modal carry over from line to
//! line. The table is re-rendered after every command that changes it.
//!
//! ## Module Structure
//!
//! - `commands`: Session wiring, the interactive loop and per-command handlers
//! - `render`: Output formatting (table, form, toasts)
//! - `setup`: Argument parsing via clap
//! - `styles`: Terminal styling constants

mod commands;
mod render;
pub mod setup;
mod styles;

pub use commands::run;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "PAYDASH_LOG";

/// Installs the stderr log subscriber. `PAYDASH_LOG` wins over `--verbose`.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
