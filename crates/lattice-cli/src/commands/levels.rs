//! Levels command implementation.
//!
//! Prints the valued lattice one node per row, root first, with optional
//! per-node hedge ratios.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use lattice_core::levels::hedge_ratios;
use lattice_core::Level;

use crate::cli::OutputFormat;
use crate::commands::ContractArgs;
use crate::output::{print_csv, print_header, print_json, print_table, print_warning};

/// Arguments for the levels command.
#[derive(Args, Debug)]
pub struct LevelsArgs {
    #[command(flatten)]
    pub contract: ContractArgs,

    /// Include the hedge ratio (delta) of every non-terminal node
    #[arg(long)]
    pub hedge: bool,

    /// Only show levels up to this depth
    #[arg(short = 'd', long)]
    pub max_depth: Option<usize>,
}

/// One lattice node for display.
#[derive(Debug, Serialize, Tabled)]
pub struct LevelRow {
    #[tabled(rename = "Depth")]
    pub depth: usize,
    #[tabled(rename = "Node")]
    pub node: usize,
    #[tabled(rename = "Price")]
    pub price: String,
    #[tabled(rename = "Time (y)")]
    pub time: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Delta")]
    pub delta: String,
}

/// Full levels output, used for JSON.
#[derive(Debug, Serialize)]
struct LevelsReport<'a> {
    value: f64,
    levels: &'a [Level],
    #[serde(skip_serializing_if = "Option::is_none")]
    hedge_ratios: Option<Vec<Vec<f64>>>,
}

/// Execute the levels command.
pub fn execute(args: LevelsArgs, format: OutputFormat) -> Result<()> {
    let (_, mut engine) = args.contract.engine()?;
    let value = engine.price()?;
    let all_levels = engine.levels()?;

    let shown = args
        .max_depth
        .map_or(all_levels.len(), |d| (d + 1).min(all_levels.len()));
    if shown < all_levels.len() && format == OutputFormat::Table {
        print_warning(&format!(
            "showing {} of {} levels",
            shown,
            all_levels.len()
        ));
    }
    let levels = &all_levels[..shown];
    let deltas = args.hedge.then(|| hedge_ratios(&all_levels)).transpose()?;

    match format {
        OutputFormat::Json => print_json(&LevelsReport {
            value,
            levels,
            hedge_ratios: deltas.map(|mut d| {
                d.truncate(shown);
                d
            }),
        })?,
        OutputFormat::Minimal => println!("{value:.6}"),
        OutputFormat::Table => {
            print_header(&format!("Lattice Levels (value {value:.6})"));
            print_table(&rows(levels, deltas.as_deref()));
        }
        OutputFormat::Csv => print_csv(&rows(levels, deltas.as_deref()))?,
    }

    Ok(())
}

fn rows(levels: &[Level], deltas: Option<&[Vec<f64>]>) -> Vec<LevelRow> {
    let mut rows = Vec::new();
    for (depth, level) in levels.iter().enumerate() {
        for (node, entry) in level.iter().enumerate() {
            let delta = deltas
                .and_then(|d| d.get(depth))
                .and_then(|l| l.get(node))
                .map(|d| format!("{d:.4}"))
                .unwrap_or_default();
            rows.push(LevelRow {
                depth,
                node,
                price: format!("{:.4}", entry.price),
                time: format!("{:.4}", entry.time),
                value: format!("{:.4}", entry.option_value),
                delta,
            });
        }
    }
    rows
}
