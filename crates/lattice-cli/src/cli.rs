//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{LevelsArgs, PriceArgs, TemplateArgs};

/// Lattice - Cox-Ross-Rubinstein binomial option pricing
#[derive(Parser)]
#[command(name = "lattice")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Log engine diagnostics to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Value an option and show the derived lattice parameters
    Price(PriceArgs),

    /// Show the valued lattice level by level
    Levels(LevelsArgs),

    /// Print a sample pricing configuration
    Template(TemplateArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (just the value)
    Minimal,
}
