//! Closed-form Black-Scholes-Merton reference prices.
//!
//! The lattice converges to these values for European options as the step
//! count grows. Rates, dividend yield and volatility are in percent, matching
//! the engine's inputs.

use statrs::function::erf::erfc;

use crate::error::{LatticeError, LatticeResult};
use crate::types::OptionKind;

/// Standard normal cumulative distribution function.
#[must_use]
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Black-Scholes-Merton price of a European option with continuous
/// dividend yield.
///
/// # Formula
///
/// C = S·e^(-qT)·N(d1) - K·e^(-rT)·N(d2)
/// P = K·e^(-rT)·N(-d2) - S·e^(-qT)·N(-d1)
pub fn black_scholes(
    kind: OptionKind,
    spot: f64,
    strike: f64,
    rate: f64,
    dividend_yield: f64,
    volatility: f64,
    maturity: f64,
) -> LatticeResult<f64> {
    if spot <= 0.0 || strike <= 0.0 {
        return Err(LatticeError::invalid_input(
            "strike",
            "spot and strike must be positive for the closed form",
        ));
    }
    if volatility <= 0.0 || maturity <= 0.0 {
        return Err(LatticeError::invalid_input(
            "volatility",
            "volatility and maturity must be positive for the closed form",
        ));
    }

    let r = rate / 100.0;
    let q = dividend_yield / 100.0;
    let sigma = volatility / 100.0;
    let sqrt_t = maturity.sqrt();

    let d1 = ((spot / strike).ln() + (r - q + 0.5 * sigma * sigma) * maturity) / (sigma * sqrt_t);
    let d2 = d1 - sigma * sqrt_t;
    let spot_df = spot * (-q * maturity).exp();
    let strike_df = strike * (-r * maturity).exp();

    Ok(match kind {
        OptionKind::Call => spot_df * norm_cdf(d1) - strike_df * norm_cdf(d2),
        OptionKind::Put => strike_df * norm_cdf(-d2) - spot_df * norm_cdf(-d1),
    })
}

/// Right-hand side of European put-call parity, `S·e^(-qT) - K·e^(-rT)`.
#[must_use]
pub fn parity_forward(spot: f64, strike: f64, rate: f64, dividend_yield: f64, maturity: f64) -> f64 {
    spot * (-dividend_yield / 100.0 * maturity).exp() - strike * (-rate / 100.0 * maturity).exp()
}
