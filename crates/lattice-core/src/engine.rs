//! The lattice pricing engine.
//!
//! An engine moves through three stages:
//!
//! ```text
//! Configured --build_tree()--> Built --valuate()--> Valued
//! ```
//!
//! Parameters are derived and validated when the engine is configured, so a
//! `LatticeEngine` value always holds an arbitrage-free parameterisation.
//! Operations called in the wrong stage return a sequencing error.
//!
//! # Example
//!
//! ```rust
//! use lattice_core::prelude::*;
//!
//! let mut engine = LatticeEngine::builder()
//!     .spot(100.0)
//!     .rate(5.0)
//!     .maturity(1.0)
//!     .steps(2)
//!     .factors(1.2, 0.8)
//!     .strike(100.0)
//!     .option_kind(OptionKind::Call)
//!     .build()
//!     .unwrap();
//!
//! engine.build_tree().unwrap();
//! let value = engine.valuate().unwrap();
//! assert!((value - 13.28).abs() < 1e-2);
//!
//! let levels = engine.levels().unwrap();
//! assert_eq!(levels.len(), 3);
//! ```

use std::mem;

use crate::error::{LatticeError, LatticeResult};
use crate::lattice::Lattice;
use crate::levels::{self, Level};
use crate::parameters::{LatticeParameters, MarketInputs};
use crate::types::{ExerciseStyle, OptionContract, OptionKind, PricingModel};

/// Lifecycle stage of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Parameters derived, no lattice yet.
    Configured,
    /// Lattice built, no option values yet.
    Built,
    /// Every node valued; the lattice is read-only.
    Valued,
}

#[derive(Debug, Clone)]
enum State {
    Configured,
    Built(Lattice),
    Valued { lattice: Lattice, value: f64 },
}

/// Cox-Ross-Rubinstein lattice engine for a single vanilla option.
#[derive(Debug, Clone)]
pub struct LatticeEngine {
    params: LatticeParameters,
    contract: OptionContract,
    state: State,
}

impl LatticeEngine {
    /// Creates a configured engine.
    pub fn new(
        market: MarketInputs,
        model: PricingModel,
        contract: OptionContract,
    ) -> LatticeResult<Self> {
        if !contract.strike.is_finite() || contract.strike < 0.0 {
            return Err(LatticeError::invalid_input(
                "strike",
                format!("must be non-negative, got {}", contract.strike),
            ));
        }
        let params = LatticeParameters::derive(market, &model)?;

        tracing::debug!(
            contract = %contract,
            steps = market.steps,
            "Configured lattice engine"
        );

        Ok(Self {
            params,
            contract,
            state: State::Configured,
        })
    }

    /// Returns a builder for an engine.
    #[must_use]
    pub fn builder() -> LatticeEngineBuilder {
        LatticeEngineBuilder::default()
    }

    /// Derived lattice parameters.
    #[must_use]
    pub fn parameters(&self) -> &LatticeParameters {
        &self.params
    }

    /// The contract being valued.
    #[must_use]
    pub fn contract(&self) -> &OptionContract {
        &self.contract
    }

    /// Current lifecycle stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self.state {
            State::Configured => Stage::Configured,
            State::Built(_) => Stage::Built,
            State::Valued { .. } => Stage::Valued,
        }
    }

    /// The lattice, once built.
    #[must_use]
    pub fn lattice(&self) -> Option<&Lattice> {
        match &self.state {
            State::Configured => None,
            State::Built(lattice) | State::Valued { lattice, .. } => Some(lattice),
        }
    }

    /// Option value at the root, once valued.
    #[must_use]
    pub fn root_value(&self) -> Option<f64> {
        match self.state {
            State::Valued { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Immediate exercise value at the given underlying price.
    #[must_use]
    pub fn payoff(&self, price: f64) -> f64 {
        self.contract.payoff(price)
    }

    /// Forward pass: materialises every node from the root to maturity.
    pub fn build_tree(&mut self) -> LatticeResult<&Lattice> {
        if !matches!(self.state, State::Configured) {
            return Err(LatticeError::AlreadyBuilt);
        }

        let lattice = Lattice::build(&self.params);
        tracing::debug!(
            steps = lattice.steps(),
            nodes = lattice.len(),
            "Built lattice"
        );

        self.state = State::Built(lattice);
        self.lattice().ok_or(LatticeError::NotBuilt)
    }

    /// Values every node and returns the option value at the root.
    ///
    /// Terminal nodes receive the payoff; earlier levels receive the
    /// discounted risk-neutral expectation of their two children, floored
    /// at the immediate exercise value for American puts.
    pub fn valuate(&mut self) -> LatticeResult<f64> {
        let mut lattice = match mem::replace(&mut self.state, State::Configured) {
            State::Built(lattice) => lattice,
            State::Configured => return Err(LatticeError::NotBuilt),
            valued @ State::Valued { .. } => {
                self.state = valued;
                return Err(LatticeError::AlreadyValued);
            }
        };

        let value = self.backward_induction(&mut lattice);
        tracing::debug!(
            value,
            contract = %self.contract,
            "Valued lattice"
        );

        self.state = State::Valued { lattice, value };
        Ok(value)
    }

    /// Builds and values the lattice in one call.
    pub fn price(&mut self) -> LatticeResult<f64> {
        self.build_tree()?;
        self.valuate()
    }

    /// Root-to-maturity projection of `(price, time, option_value)` per level,
    /// up-most node first.
    pub fn levels(&self) -> LatticeResult<Vec<Level>> {
        match &self.state {
            State::Valued { lattice, .. } => Ok(levels::project(lattice)),
            _ => Err(LatticeError::NotValued),
        }
    }

    fn backward_induction(&self, lattice: &mut Lattice) -> f64 {
        let steps = lattice.steps();
        let p = self.params.probability_up;
        let q = self.params.probability_down();
        let growth = self.params.discount_factor;
        let early_exercise = self.contract.checks_early_exercise();

        // Values of the level below, indexed by number of up moves.
        let mut values: Vec<f64> = lattice
            .terminal_nodes()
            .iter()
            .map(|node| self.contract.payoff(node.price))
            .collect();
        let terminal_start = lattice.index(steps, 0);
        for (j, &value) in values.iter().enumerate() {
            lattice.set_option_value(terminal_start + j, value);
        }

        let mut exercised = 0_usize;
        for depth in (0..steps).rev() {
            let start = lattice.index(depth, 0);
            let level: Vec<f64> = lattice
                .level(depth)
                .iter()
                .enumerate()
                .map(|(j, node)| {
                    let continuation = (p * values[j + 1] + q * values[j]) / growth;
                    if !early_exercise {
                        return continuation;
                    }
                    let intrinsic = self.contract.payoff(node.price);
                    if intrinsic > continuation {
                        exercised += 1;
                    }
                    continuation.max(intrinsic)
                })
                .collect();

            for (j, &value) in level.iter().enumerate() {
                lattice.set_option_value(start + j, value);
            }
            values = level;
            tracing::trace!(depth, "Valued lattice level");
        }

        if early_exercise {
            tracing::debug!(exercised, "Early exercise nodes");
        }

        values[0]
    }
}

/// Builder for [`LatticeEngine`].
///
/// Exactly one of [`volatility`](Self::volatility) and
/// [`factors`](Self::factors) must be set.
#[derive(Debug, Clone, Default)]
pub struct LatticeEngineBuilder {
    spot: Option<f64>,
    rate: f64,
    dividend_yield: f64,
    maturity: Option<f64>,
    steps: Option<usize>,
    volatility: Option<f64>,
    factors: Option<(f64, f64)>,
    strike: Option<f64>,
    kind: OptionKind,
    exercise: ExerciseStyle,
}

impl LatticeEngineBuilder {
    /// Initial underlying price.
    #[must_use]
    pub fn spot(mut self, spot: f64) -> Self {
        self.spot = Some(spot);
        self
    }

    /// Risk-free rate, percent. Defaults to 0.
    #[must_use]
    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    /// Continuous dividend yield, percent. Defaults to 0.
    #[must_use]
    pub fn dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.dividend_yield = dividend_yield;
        self
    }

    /// Time to maturity in years.
    #[must_use]
    pub fn maturity(mut self, maturity: f64) -> Self {
        self.maturity = Some(maturity);
        self
    }

    /// Number of lattice steps.
    #[must_use]
    pub fn steps(mut self, steps: usize) -> Self {
        self.steps = Some(steps);
        self
    }

    /// Annualised volatility, percent.
    #[must_use]
    pub fn volatility(mut self, sigma: f64) -> Self {
        self.volatility = Some(sigma);
        self
    }

    /// Explicit up and down factors.
    #[must_use]
    pub fn factors(mut self, up: f64, down: f64) -> Self {
        self.factors = Some((up, down));
        self
    }

    /// Sets the step model directly, replacing any volatility or factors.
    #[must_use]
    pub fn model(mut self, model: PricingModel) -> Self {
        match model {
            PricingModel::Volatility { sigma } => {
                self.volatility = Some(sigma);
                self.factors = None;
            }
            PricingModel::ExplicitFactors { up, down } => {
                self.volatility = None;
                self.factors = Some((up, down));
            }
        }
        self
    }

    /// Strike price.
    #[must_use]
    pub fn strike(mut self, strike: f64) -> Self {
        self.strike = Some(strike);
        self
    }

    /// Call or put. Defaults to call.
    #[must_use]
    pub fn option_kind(mut self, kind: OptionKind) -> Self {
        self.kind = kind;
        self
    }

    /// European or American. Defaults to European.
    #[must_use]
    pub fn exercise(mut self, exercise: ExerciseStyle) -> Self {
        self.exercise = exercise;
        self
    }

    /// Derives parameters and returns a configured engine.
    pub fn build(self) -> LatticeResult<LatticeEngine> {
        let model = match (self.volatility, self.factors) {
            (Some(sigma), None) => PricingModel::volatility(sigma),
            (None, Some((up, down))) => PricingModel::factors(up, down),
            (None, None) => return Err(LatticeError::MissingPricingModel),
            (Some(_), Some(_)) => return Err(LatticeError::ConflictingPricingModel),
        };

        let market = MarketInputs {
            spot: self
                .spot
                .ok_or_else(|| LatticeError::invalid_input("spot", "required"))?,
            rate: self.rate,
            dividend_yield: self.dividend_yield,
            maturity: self
                .maturity
                .ok_or_else(|| LatticeError::invalid_input("maturity", "required"))?,
            steps: self
                .steps
                .ok_or_else(|| LatticeError::invalid_input("steps", "required"))?,
        };
        let strike = self
            .strike
            .ok_or_else(|| LatticeError::invalid_input("strike", "required"))?;

        LatticeEngine::new(
            market,
            model,
            OptionContract::new(strike, self.kind, self.exercise),
        )
    }
}
