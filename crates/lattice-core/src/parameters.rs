//! Derivation of per-step lattice parameters from market inputs.

use serde::{Deserialize, Serialize};

use crate::error::{LatticeError, LatticeResult};
use crate::types::PricingModel;

/// Largest supported step count.
///
/// The recombined lattice holds `(steps + 1)(steps + 2) / 2` nodes of 72 bytes
/// each, so the cap allows about 2M nodes (roughly 145 MB) per engine, plus
/// about 48 MB for a copy returned by `levels()`.
pub const MAX_STEPS: usize = 2_000;

/// Market inputs for a lattice, with rates quoted in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketInputs {
    /// Initial underlying price `S0`.
    pub spot: f64,
    /// Continuously compounded risk-free rate, percent.
    pub rate: f64,
    /// Continuous dividend yield, percent.
    pub dividend_yield: f64,
    /// Total time to maturity in years.
    pub maturity: f64,
    /// Number of lattice steps.
    pub steps: usize,
}

/// Parameters derived once at configuration time and shared by every node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatticeParameters {
    /// The market inputs the parameters were derived from.
    pub market: MarketInputs,
    /// Step length `T / n` in years.
    pub time_step: f64,
    /// Up factor `u`.
    pub up: f64,
    /// Down factor `d`.
    pub down: f64,
    /// `(r - q) / 100`.
    pub effective_rate: f64,
    /// Per-step growth of a risk-free, dividend-adjusted investment,
    /// `exp(effective_rate · Δt)`. Continuation values are divided by it.
    pub discount_factor: f64,
    /// Risk-neutral probability of an up move.
    pub probability_up: f64,
}

impl LatticeParameters {
    /// Derives lattice parameters, rejecting inputs that would produce a
    /// meaningless lattice.
    ///
    /// # Formula
    ///
    /// p = (exp((r - q)Δt) - d) / (u - d), valid only when d < exp((r - q)Δt) < u
    pub fn derive(market: MarketInputs, model: &PricingModel) -> LatticeResult<Self> {
        validate_market(&market)?;

        let time_step = market.maturity / market.steps as f64;
        let (up, down) = model.resolve(time_step)?;

        let effective_rate = (market.rate - market.dividend_yield) / 100.0;
        let discount_factor = (effective_rate * time_step).exp();
        let probability_up = (discount_factor - down) / (up - down);

        if !probability_up.is_finite() || probability_up <= 0.0 || probability_up >= 1.0 {
            return Err(LatticeError::ArbitrageViolation {
                probability_up,
                up,
                down,
                growth: discount_factor,
            });
        }

        tracing::debug!(
            probability_up,
            discount_factor,
            up_factor = up,
            down_factor = down,
            time_step,
            "Derived lattice parameters"
        );

        Ok(Self {
            market,
            time_step,
            up,
            down,
            effective_rate,
            discount_factor,
            probability_up,
        })
    }

    /// Risk-neutral probability of a down move.
    #[must_use]
    pub fn probability_down(&self) -> f64 {
        1.0 - self.probability_up
    }

    /// Number of lattice steps.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.market.steps
    }

    /// Underlying price after `ups` up moves in `depth` steps.
    #[must_use]
    pub fn price_at(&self, depth: usize, ups: usize) -> f64 {
        let downs = depth - ups;
        self.market.spot * self.up.powi(ups as i32) * self.down.powi(downs as i32)
    }
}

fn validate_market(market: &MarketInputs) -> LatticeResult<()> {
    if !market.spot.is_finite() || market.spot <= 0.0 {
        return Err(LatticeError::invalid_input(
            "spot",
            format!("must be positive, got {}", market.spot),
        ));
    }
    if !market.rate.is_finite() {
        return Err(LatticeError::invalid_input("rate", "must be finite"));
    }
    if !market.dividend_yield.is_finite() {
        return Err(LatticeError::invalid_input("dividend_yield", "must be finite"));
    }
    if !market.maturity.is_finite() || market.maturity <= 0.0 {
        return Err(LatticeError::invalid_input(
            "maturity",
            format!("must be positive, got {}", market.maturity),
        ));
    }
    if market.steps == 0 || market.steps > MAX_STEPS {
        return Err(LatticeError::invalid_input(
            "steps",
            format!("must be in 1..={MAX_STEPS}, got {}", market.steps),
        ));
    }
    Ok(())
}
