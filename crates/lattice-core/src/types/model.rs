//! Lattice step model.

use serde::{Deserialize, Serialize};

use crate::error::{LatticeError, LatticeResult};

/// How the per-step up and down factors are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum PricingModel {
    /// Cox-Ross-Rubinstein factors from an annualised volatility in percent.
    Volatility {
        /// Annualised volatility, percent (20.0 = 20%).
        sigma: f64,
    },
    /// Explicit up and down multipliers applied at every step.
    ExplicitFactors {
        /// Up factor `u`.
        up: f64,
        /// Down factor `d`.
        down: f64,
    },
}

impl PricingModel {
    /// Creates a volatility-driven model.
    #[must_use]
    pub fn volatility(sigma: f64) -> Self {
        Self::Volatility { sigma }
    }

    /// Creates a model with explicit factors.
    #[must_use]
    pub fn factors(up: f64, down: f64) -> Self {
        Self::ExplicitFactors { up, down }
    }

    /// Resolves the model into concrete `(u, d)` for the given step length.
    ///
    /// # Formula
    ///
    /// u = exp(σ/100 · √Δt), d = exp(-σ/100 · √Δt)
    pub fn resolve(&self, time_step: f64) -> LatticeResult<(f64, f64)> {
        let (up, down) = match *self {
            PricingModel::Volatility { sigma } => {
                if !sigma.is_finite() || sigma <= 0.0 {
                    return Err(LatticeError::invalid_input(
                        "volatility",
                        format!("must be positive, got {sigma}"),
                    ));
                }
                let jump = sigma / 100.0 * time_step.sqrt();
                (jump.exp(), (-jump).exp())
            }
            PricingModel::ExplicitFactors { up, down } => (up, down),
        };

        if !up.is_finite() || !down.is_finite() || down <= 0.0 {
            return Err(LatticeError::invalid_input(
                "down_factor",
                format!("factors must be finite and positive, got u = {up}, d = {down}"),
            ));
        }
        if up <= down {
            return Err(LatticeError::invalid_input(
                "up_factor",
                format!("up factor {up} must exceed down factor {down}"),
            ));
        }
        Ok((up, down))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_crr_factors() {
        let (u, d) = PricingModel::volatility(20.0).resolve(0.25).unwrap();
        assert_relative_eq!(u, (0.1_f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(u * d, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_explicit_factors_pass_through() {
        let (u, d) = PricingModel::factors(1.2, 0.8).resolve(0.5).unwrap();
        assert_eq!((u, d), (1.2, 0.8));
    }

    #[test]
    fn test_rejects_bad_factors() {
        assert!(PricingModel::factors(0.8, 1.2).resolve(1.0).is_err());
        assert!(PricingModel::factors(1.2, 0.0).resolve(1.0).is_err());
        assert!(PricingModel::volatility(0.0).resolve(1.0).is_err());
        assert!(PricingModel::volatility(f64::NAN).resolve(1.0).is_err());
    }
}
