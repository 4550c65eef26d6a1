//! CLI command implementations.

pub mod levels;
pub mod price;
pub mod template;

pub use levels::LevelsArgs;
pub use price::PriceArgs;
pub use template::TemplateArgs;

use std::path::PathBuf;

use clap::Args;
use lattice_config::PricingConfig;
use lattice_core::{ExerciseStyle, LatticeEngine, OptionKind};

use crate::error::CliResult;

/// Contract and market arguments shared by `price` and `levels`.
///
/// Flags override values read from `--config`. Without a config file the
/// defaults describe a one-year at-the-money European call.
#[derive(Args, Debug, Clone)]
pub struct ContractArgs {
    /// Pricing configuration file (.toml or .json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Initial underlying price
    #[arg(long)]
    pub spot: Option<f64>,

    /// Strike price
    #[arg(short = 'k', long)]
    pub strike: Option<f64>,

    /// Risk-free rate (as percentage, e.g., 5.0 for 5%)
    #[arg(short, long)]
    pub rate: Option<f64>,

    /// Continuous dividend yield (as percentage)
    #[arg(short = 'q', long)]
    pub dividend_yield: Option<f64>,

    /// Time to maturity in years
    #[arg(short = 't', long)]
    pub maturity: Option<f64>,

    /// Number of lattice steps
    #[arg(short = 'n', long)]
    pub steps: Option<usize>,

    /// Annualised volatility (as percentage)
    #[arg(short = 's', long, conflicts_with_all = ["up", "down"])]
    pub volatility: Option<f64>,

    /// Explicit up factor
    #[arg(long, requires = "down")]
    pub up: Option<f64>,

    /// Explicit down factor
    #[arg(long, requires = "up")]
    pub down: Option<f64>,

    /// Option kind: call or put
    #[arg(short, long)]
    pub option: Option<OptionKind>,

    /// Exercise style: European or American
    #[arg(short, long)]
    pub exercise: Option<ExerciseStyle>,
}

impl ContractArgs {
    /// Resolves the arguments into a pricing configuration.
    pub fn resolve(&self) -> CliResult<PricingConfig> {
        let mut config = match &self.config {
            Some(path) => PricingConfig::load(path)?,
            None => PricingConfig::new("CLI"),
        };

        if let Some(spot) = self.spot {
            config.spot = spot;
        }
        if let Some(strike) = self.strike {
            config.strike = strike;
        }
        if let Some(rate) = self.rate {
            config.rate = rate;
        }
        if let Some(q) = self.dividend_yield {
            config.dividend_yield = q;
        }
        if let Some(maturity) = self.maturity {
            config.maturity = maturity;
        }
        if let Some(steps) = self.steps {
            config.steps = steps;
        }
        if let Some(option) = self.option {
            config.option = option;
        }
        if let Some(exercise) = self.exercise {
            config.exercise = exercise;
        }

        // clap keeps --volatility and --up/--down mutually exclusive.
        if let Some(sigma) = self.volatility {
            config = config.with_volatility(sigma);
        }
        if let (Some(up), Some(down)) = (self.up, self.down) {
            config = config.with_factors(up, down);
        }

        Ok(config)
    }

    /// Resolves the arguments and returns a configured engine.
    pub fn engine(&self) -> CliResult<(PricingConfig, LatticeEngine)> {
        let config = self.resolve()?;
        let engine = config.build_engine()?;
        Ok((config, engine))
    }
}
