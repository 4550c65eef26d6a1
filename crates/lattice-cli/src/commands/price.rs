//! Price command implementation.
//!
//! Values an option on the lattice and reports the derived parameters,
//! the root hedge ratio and, where available, reference values.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use lattice_core::analytic::black_scholes;
use lattice_core::levels::root_delta;
use lattice_core::{ExerciseStyle, LatticeEngine, OptionKind};

use crate::cli::OutputFormat;
use crate::commands::ContractArgs;
use crate::output::{print_csv, print_header, print_json, print_table, print_warning, KeyValue};

/// Arguments for the price command.
#[derive(Args, Debug)]
pub struct PriceArgs {
    #[command(flatten)]
    pub contract: ContractArgs,
}

/// Price command result, used for JSON output.
#[derive(Debug, Serialize)]
pub struct PriceReport {
    pub name: String,
    pub option: OptionKind,
    pub exercise: ExerciseStyle,
    pub steps: usize,
    pub up_factor: f64,
    pub down_factor: f64,
    pub probability_up: f64,
    pub discount_factor: f64,
    pub value: f64,
    pub delta: Option<f64>,
    pub european_value: Option<f64>,
    pub black_scholes: Option<f64>,
}

/// Execute the price command.
pub fn execute(args: PriceArgs, format: OutputFormat) -> Result<()> {
    let (config, mut engine) = args.contract.engine()?;
    let value = engine.price()?;
    let delta = root_delta(&engine.levels()?);

    // Value of the same contract without early exercise.
    let european_value = if config.exercise == ExerciseStyle::American {
        let mut european = config
            .clone()
            .with_contract(config.option, ExerciseStyle::European)
            .build_engine()?;
        Some(european.price()?)
    } else {
        None
    };

    // Closed-form limit of the lattice, which discounts at the carry rate.
    let reference = config
        .volatility
        .filter(|_| config.exercise == ExerciseStyle::European)
        .and_then(|sigma| {
            black_scholes(
                config.option,
                config.spot,
                config.strike,
                config.rate - config.dividend_yield,
                0.0,
                sigma,
                config.maturity,
            )
            .ok()
        });

    if config.exercise == ExerciseStyle::American
        && config.option == OptionKind::Call
        && config.dividend_yield > 0.0
    {
        print_warning("American calls are valued without an early-exercise check");
    }

    let report = report(&config.name, &engine, value, delta, european_value, reference);

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Minimal => println!("{value:.6}"),
        OutputFormat::Table => {
            print_header("Lattice Pricing Results");
            print_table(&rows(&report));
        }
        OutputFormat::Csv => print_csv(&rows(&report))?,
    }

    Ok(())
}

fn report(
    name: &str,
    engine: &LatticeEngine,
    value: f64,
    delta: Option<f64>,
    european_value: Option<f64>,
    black_scholes: Option<f64>,
) -> PriceReport {
    let params = engine.parameters();
    let contract = engine.contract();
    PriceReport {
        name: name.to_string(),
        option: contract.kind,
        exercise: contract.exercise,
        steps: params.steps(),
        up_factor: params.up,
        down_factor: params.down,
        probability_up: params.probability_up,
        discount_factor: params.discount_factor,
        value,
        delta,
        european_value,
        black_scholes,
    }
}

fn rows(report: &PriceReport) -> Vec<KeyValue> {
    let mut rows = vec![
        KeyValue::new("Contract", format!("{} {}", report.exercise, report.option)),
        KeyValue::new("Steps", report.steps.to_string()),
        KeyValue::from_f64("Up Factor", report.up_factor, 6),
        KeyValue::from_f64("Down Factor", report.down_factor, 6),
        KeyValue::from_f64("Probability Up", report.probability_up, 6),
        KeyValue::from_f64("Discount Factor", report.discount_factor, 6),
        KeyValue::from_f64("Option Value", report.value, 6),
    ];

    if let Some(delta) = report.delta {
        rows.push(KeyValue::from_f64("Delta", delta, 6));
    }
    if let Some(european) = report.european_value {
        rows.push(KeyValue::from_f64("European Value", european, 6));
        rows.push(KeyValue::from_f64(
            "Early Exercise Premium",
            report.value - european,
            6,
        ));
    }
    if let Some(bs) = report.black_scholes {
        rows.push(KeyValue::from_f64("Black-Scholes", bs, 6));
    }
    rows
}
