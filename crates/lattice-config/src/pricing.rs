//! Pricing configuration for a single lattice valuation.

use serde::{Deserialize, Serialize};

use lattice_core::{
    ExerciseStyle, LatticeEngine, LatticeError, OptionKind, PricingModel, MAX_STEPS,
};

use crate::error::{ConfigResult, Validate, ValidationError};

/// Contract and market inputs for one lattice valuation.
///
/// Rates, dividend yield and volatility are in percent. Supply either
/// `volatility` or both `up_factor` and `down_factor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Configuration name/identifier.
    pub name: String,

    /// Description of this configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Initial underlying price.
    pub spot: f64,

    /// Strike price.
    pub strike: f64,

    /// Continuously compounded risk-free rate, percent.
    #[serde(default)]
    pub rate: f64,

    /// Continuous dividend yield, percent.
    #[serde(default)]
    pub dividend_yield: f64,

    /// Time to maturity in years.
    pub maturity: f64,

    /// Number of lattice steps.
    #[serde(default = "default_steps")]
    pub steps: usize,

    /// Annualised volatility, percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,

    /// Explicit up factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_factor: Option<f64>,

    /// Explicit down factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_factor: Option<f64>,

    /// Call or put.
    #[serde(default)]
    pub option: OptionKind,

    /// European or American.
    #[serde(default)]
    pub exercise: ExerciseStyle,
}

fn default_steps() -> usize {
    100
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self::template()
    }
}

impl PricingConfig {
    /// Creates a configuration for an at-the-money European call with a
    /// 20% volatility.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            spot: 100.0,
            strike: 100.0,
            rate: 5.0,
            dividend_yield: 0.0,
            maturity: 1.0,
            steps: default_steps(),
            volatility: Some(20.0),
            up_factor: None,
            down_factor: None,
            option: OptionKind::Call,
            exercise: ExerciseStyle::European,
        }
    }

    /// The two-step American put from Hull's textbook example.
    pub fn template() -> Self {
        Self {
            name: "HULL.AMERICAN.PUT".to_string(),
            description: Some("Two-step American put, S=50, K=52, u=1.2, d=0.8".to_string()),
            spot: 50.0,
            strike: 52.0,
            rate: 5.0,
            dividend_yield: 0.0,
            maturity: 2.0,
            steps: 2,
            volatility: None,
            up_factor: Some(1.2),
            down_factor: Some(0.8),
            option: OptionKind::Put,
            exercise: ExerciseStyle::American,
        }
    }

    /// Builder method to set description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the underlying and strike.
    #[must_use]
    pub fn with_spot_and_strike(mut self, spot: f64, strike: f64) -> Self {
        self.spot = spot;
        self.strike = strike;
        self
    }

    /// Builder method to set the rate and dividend yield.
    #[must_use]
    pub fn with_rates(mut self, rate: f64, dividend_yield: f64) -> Self {
        self.rate = rate;
        self.dividend_yield = dividend_yield;
        self
    }

    /// Builder method to set maturity and step count.
    #[must_use]
    pub fn with_schedule(mut self, maturity: f64, steps: usize) -> Self {
        self.maturity = maturity;
        self.steps = steps;
        self
    }

    /// Builder method to use a volatility-driven model.
    #[must_use]
    pub fn with_volatility(mut self, sigma: f64) -> Self {
        self.volatility = Some(sigma);
        self.up_factor = None;
        self.down_factor = None;
        self
    }

    /// Builder method to use explicit factors.
    #[must_use]
    pub fn with_factors(mut self, up: f64, down: f64) -> Self {
        self.volatility = None;
        self.up_factor = Some(up);
        self.down_factor = Some(down);
        self
    }

    /// Builder method to set the contract type.
    #[must_use]
    pub fn with_contract(mut self, option: OptionKind, exercise: ExerciseStyle) -> Self {
        self.option = option;
        self.exercise = exercise;
        self
    }

    /// Resolves the volatility / factor fields into a step model.
    pub fn pricing_model(&self) -> Result<PricingModel, LatticeError> {
        match (self.volatility, self.up_factor, self.down_factor) {
            (Some(sigma), None, None) => Ok(PricingModel::volatility(sigma)),
            (None, Some(up), Some(down)) => Ok(PricingModel::factors(up, down)),
            (None, None, None) => Err(LatticeError::MissingPricingModel),
            (None, Some(_), None) => Err(LatticeError::invalid_input(
                "down_factor",
                "required when up_factor is given",
            )),
            (None, None, Some(_)) => Err(LatticeError::invalid_input(
                "up_factor",
                "required when down_factor is given",
            )),
            (Some(_), _, _) => Err(LatticeError::ConflictingPricingModel),
        }
    }

    /// Validates the configuration and returns a configured engine.
    pub fn build_engine(&self) -> ConfigResult<LatticeEngine> {
        self.validate_or_error()?;
        let model = self.pricing_model()?;

        tracing::debug!(config = %self.name, ?model, "Resolving pricing configuration");

        let engine = LatticeEngine::builder()
            .spot(self.spot)
            .strike(self.strike)
            .rate(self.rate)
            .dividend_yield(self.dividend_yield)
            .maturity(self.maturity)
            .steps(self.steps)
            .model(model)
            .option_kind(self.option)
            .exercise(self.exercise)
            .build()?;
        Ok(engine)
    }
}

impl Validate for PricingConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push(ValidationError::new("name", "Name cannot be empty"));
        }

        if !self.spot.is_finite() || self.spot <= 0.0 {
            errors.push(ValidationError::with_rule(
                "spot",
                format!("Spot {} must be positive", self.spot),
                "positive",
            ));
        }

        if !self.strike.is_finite() || self.strike < 0.0 {
            errors.push(ValidationError::with_rule(
                "strike",
                format!("Strike {} must be non-negative", self.strike),
                "non_negative",
            ));
        }

        if !self.maturity.is_finite() || self.maturity <= 0.0 {
            errors.push(ValidationError::with_rule(
                "maturity",
                format!("Maturity {} must be positive", self.maturity),
                "positive",
            ));
        }

        if self.steps == 0 || self.steps > MAX_STEPS {
            errors.push(ValidationError::with_rule(
                "steps",
                format!("Steps must be between 1 and {MAX_STEPS}"),
                "valid_steps",
            ));
        }

        if !self.rate.is_finite() || !self.dividend_yield.is_finite() {
            errors.push(ValidationError::new(
                "rate",
                "Rate and dividend yield must be finite",
            ));
        }

        if let Some(sigma) = self.volatility {
            if !sigma.is_finite() || sigma <= 0.0 || sigma > 500.0 {
                errors.push(ValidationError::with_rule(
                    "volatility",
                    "Volatility must be between 0 and 500 percent",
                    "valid_volatility",
                ));
            }
        }

        if let Err(err) = self.pricing_model() {
            errors.push(ValidationError::with_rule(
                "volatility",
                err.to_string(),
                "single_model",
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_template_is_valid() {
        let config = PricingConfig::template();
        assert!(config.is_valid());
        assert_eq!(
            config.pricing_model().unwrap(),
            PricingModel::factors(1.2, 0.8)
        );
    }

    #[test]
    fn test_template_prices_hull_example() {
        let mut engine = PricingConfig::template().build_engine().unwrap();
        assert_relative_eq!(engine.price().unwrap(), 5.0896, epsilon = 1e-4);
    }

    #[test]
    fn test_builder_methods() {
        let config = PricingConfig::new("ATM.PUT")
            .with_description("at the money")
            .with_spot_and_strike(100.0, 105.0)
            .with_rates(4.0, 1.0)
            .with_schedule(0.5, 50)
            .with_factors(1.05, 0.95)
            .with_contract(OptionKind::Put, ExerciseStyle::American);

        assert_eq!(config.description.as_deref(), Some("at the money"));
        assert_eq!(config.volatility, None);
        assert_eq!(config.steps, 50);
        assert!(config.is_valid());

        let config = config.with_volatility(25.0);
        assert_eq!(config.pricing_model().unwrap(), PricingModel::volatility(25.0));
    }

    #[test]
    fn test_validation() {
        let mut config = PricingConfig::new("test");
        assert!(config.is_valid());

        config.name = String::new();
        assert!(!config.is_valid());

        config.name = "test".to_string();
        config.steps = 0;
        assert!(!config.is_valid());

        config.steps = 10;
        config.spot = -5.0;
        config.maturity = 0.0;
        assert_eq!(config.validate().len(), 2);
    }

    #[test]
    fn test_model_selection_errors() {
        let mut config = PricingConfig::new("test");
        config.volatility = None;
        assert_eq!(config.pricing_model(), Err(LatticeError::MissingPricingModel));
        assert!(!config.is_valid());

        config.up_factor = Some(1.1);
        assert!(matches!(
            config.pricing_model(),
            Err(LatticeError::InvalidInput { field: "down_factor", .. })
        ));

        config.down_factor = Some(0.9);
        config.volatility = Some(20.0);
        assert_eq!(config.pricing_model(), Err(LatticeError::ConflictingPricingModel));
    }

    #[test]
    fn test_build_engine_surfaces_arbitrage() {
        let config = PricingConfig::new("bad")
            .with_factors(1.01, 0.99)
            .with_rates(20.0, 0.0)
            .with_schedule(1.0, 1);
        assert!(config.is_valid());
        let err = config.build_engine().unwrap_err();
        assert!(matches!(
            err,
            crate::ConfigError::Lattice(LatticeError::ArbitrageViolation { .. })
        ));
    }
}
