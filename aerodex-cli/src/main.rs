//! `aerodex` - search-as-you-type over an airport directory, from the terminal.

mod cli;
mod commands;
mod config;
mod logging;
mod render;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::commands::App;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let Cli { global, command } = Cli::parse();
    logging::init(global.verbose)?;

    let mut config = Config::load(global.config.as_deref())?;
    if let Some(data) = global.data {
        config.directory.data = data;
    }
    config.validate()?;
    let app = App::from_config(&config)?;

    match command {
        Command::Search { query } => println!("{}", app.search(&query).await?),
        Command::Browse { query, pages } => {
            app.browse(&query, pages, |page| println!("{page}\n")).await?;
        },
        Command::Type {
            prefixes,
            interval_ms,
        } => {
            let interval = std::time::Duration::from_millis(interval_ms);
            println!("{}", app.type_ahead(&prefixes, interval).await?);
        },
        Command::Route { path, method } => println!("{}", app.route(method, &path)?),
    }
    Ok(())
}
