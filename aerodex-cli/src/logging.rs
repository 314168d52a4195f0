//! Structured JSON logging to stderr.
//!
//! Each event is one JSON object per line, with the event fields flattened
//! next to `level` and `message`:
//!
//! ```json
//! {"timestamp":"2026-01-16T10:30:00.000000Z","level":"WARN","message":"page fetch failed","page":1,"error":"unexpected status 503"}
//! ```
//!
//! # Filtering (highest priority first)
//!
//! 1. `AERODEX_LOG` env var (directives, e.g. `aerodex=debug,warn`)
//! 2. `-v` flags: one for debug, two for trace
//! 3. Default level: `warn`

use anyhow::{Result, anyhow};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "AERODEX_LOG";

/// Level used when `AERODEX_LOG` is unset, from the number of `-v` flags.
pub const fn default_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(verbose: u8) -> Result<()> {
    let json = fmt::layer()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(build_filter(std::env::var(LOG_ENV).ok().as_deref(), verbose))
        .with(json)
        .try_init()
        .map_err(|err| anyhow!("installing log subscriber: {err}"))
}

/// Directives from `env` when they parse, else the `-v` derived level.
fn build_filter(env: Option<&str>, verbose: u8) -> EnvFilter {
    if let Some(directives) = env
        && let Ok(filter) = EnvFilter::try_new(directives)
    {
        return filter;
    }
    EnvFilter::new(default_level(verbose).as_str())
}
