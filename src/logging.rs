//! Subscriber setup for the `tracing` events emitted by the store, drag
//! sessions and canvas.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Map a `-d` count to a filter directive.
pub fn verbosity_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install a stderr subscriber. `RUST_LOG` takes precedence over `directive`.
///
/// Returns false if a global subscriber was already set; the existing one
/// stays in place.
pub fn init(directive: &str) -> bool {
    if tracing::dispatcher::has_been_set() {
        return false;
    }
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_filter(env_filter);

    match tracing_subscriber::registry().with(layer).try_init() {
        Ok(()) => true,
        Err(e) => {
            eprintln!("[blocktree] Warning: failed to set up logging: {}", e);
            false
        }
    }
}
