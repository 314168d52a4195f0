//! Command-line arguments.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use aerodex_directory::Method;
use clap::{Args, Parser, Subcommand};

/// Search-as-you-type over an airport directory.
#[derive(Debug, Parser)]
#[command(name = "aerodex", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// TOML configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Airport data file; overrides `directory.data` from the config.
    #[arg(long, global = true, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace). `AERODEX_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the first page of results for a query.
    Search {
        /// Case-insensitive pattern over code, name, city and country.
        query: String,
    },

    /// Page through every result of a query.
    Browse {
        /// Case-insensitive pattern over code, name, city and country.
        query: String,

        /// Stop after this many pages.
        #[arg(long, value_name = "N")]
        pages: Option<NonZeroUsize>,
    },

    /// Replay keystrokes through the debounced input.
    Type {
        /// Successive contents of the search box, e.g. `b be ber`.
        #[arg(required = true, num_args = 1..)]
        prefixes: Vec<String>,

        /// Pause between keystrokes.
        #[arg(long, default_value_t = 100, value_name = "MS")]
        interval_ms: u64,
    },

    /// Print the JSON body a lookup path returns.
    Route {
        /// Path such as `/airports/page/0/berlin`.
        path: String,

        /// Request method.
        #[arg(long, default_value = "GET")]
        method: Method,
    },
}
