//! Error types for lattice construction and valuation.

use thiserror::Error;

/// A specialized Result type for lattice operations.
pub type LatticeResult<T> = Result<T, LatticeError>;

/// Errors that can occur while configuring, building or valuing a lattice.
///
/// Configuration errors are raised when the engine is set up; sequencing
/// errors are raised when an operation is called in the wrong stage.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LatticeError {
    /// Neither a volatility nor explicit up/down factors were supplied.
    #[error("Missing pricing model: supply either a volatility or explicit up/down factors")]
    MissingPricingModel,

    /// Both a volatility and explicit up/down factors were supplied.
    #[error("Conflicting pricing model: supply a volatility or explicit up/down factors, not both")]
    ConflictingPricingModel,

    /// Option kind other than call or put.
    #[error("Unsupported option kind '{0}' (expected 'call' or 'put')")]
    UnsupportedOptionKind(String),

    /// Exercise style other than European or American.
    #[error("Unsupported exercise style '{0}' (expected 'European' or 'American')")]
    UnsupportedExerciseStyle(String),

    /// The risk-neutral up probability is outside (0, 1).
    #[error(
        "Arbitrage violation: probability_up = {probability_up:.6} requires d < growth < u \
         (u = {up:.6}, d = {down:.6}, growth = {growth:.6})"
    )]
    ArbitrageViolation {
        /// Derived risk-neutral up probability.
        probability_up: f64,
        /// Up factor.
        up: f64,
        /// Down factor.
        down: f64,
        /// Per-step growth factor.
        growth: f64,
    },

    /// Invalid input parameter.
    #[error("Invalid input '{field}': {reason}")]
    InvalidInput {
        /// Name of the offending parameter.
        field: &'static str,
        /// Description of the problem.
        reason: String,
    },

    /// `valuate` was called before `build_tree`.
    #[error("Lattice has not been built: call build_tree() before valuate()")]
    NotBuilt,

    /// `levels` was called before `valuate`.
    #[error("Lattice has not been valued: call valuate() before reading levels")]
    NotValued,

    /// `build_tree` was called on an engine that already holds a lattice.
    #[error("Lattice has already been built")]
    AlreadyBuilt,

    /// `valuate` was called on an engine that has already been valued.
    #[error("Lattice has already been valued")]
    AlreadyValued,
}

impl LatticeError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Returns true for errors caused by the engine's inputs rather than
    /// by calling operations out of order.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        !self.is_sequencing()
    }

    /// Returns true for errors caused by calling operations out of order.
    #[must_use]
    pub fn is_sequencing(&self) -> bool {
        matches!(
            self,
            Self::NotBuilt | Self::NotValued | Self::AlreadyBuilt | Self::AlreadyValued
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LatticeError::invalid_input("steps", "must be at least 1");
        assert_eq!(err.to_string(), "Invalid input 'steps': must be at least 1");

        let err = LatticeError::UnsupportedOptionKind("straddle".to_string());
        assert!(err.to_string().contains("straddle"));
    }

    #[test]
    fn test_error_classification() {
        assert!(LatticeError::NotBuilt.is_sequencing());
        assert!(LatticeError::NotValued.is_sequencing());
        assert!(LatticeError::MissingPricingModel.is_configuration());
        assert!(LatticeError::ArbitrageViolation {
            probability_up: 1.2,
            up: 1.1,
            down: 0.9,
            growth: 1.14,
        }
        .is_configuration());
    }
}
