//! Lattice CLI - binomial lattice option pricing from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Price an American put with a 20% volatility
//! lattice price --spot 100 --strike 100 --rate 5 --maturity 1 --steps 200 \
//!     --volatility 20 --option put --exercise american
//!
//! # Show every lattice level with hedge ratios
//! lattice levels --spot 100 --strike 100 --rate 5 --maturity 1 --steps 2 \
//!     --up 1.2 --down 0.8 --hedge
//!
//! # Price from a configuration file
//! lattice price --config hull.toml
//!
//! # Print a sample configuration
//! lattice template --as toml
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let format = cli.format;

    match cli.command {
        Commands::Price(args) => commands::price::execute(args, format)?,
        Commands::Levels(args) => commands::levels::execute(args, format)?,
        Commands::Template(args) => commands::template::execute(&args)?,
    }

    Ok(())
}
