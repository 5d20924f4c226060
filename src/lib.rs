//! Command-line embedding of `jsoncore`: settings, logging and the
//! `fmt` / `get` / `check` commands. All JSON semantics live in the core.

pub mod cli;
pub mod commands;
pub mod config;

use tracing_subscriber::EnvFilter;

pub use commands::run;
pub use config::{load_config, Config};

/// Logs go to stderr so stdout stays clean JSON. `RUST_LOG` overrides the
/// default `warn` level.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
