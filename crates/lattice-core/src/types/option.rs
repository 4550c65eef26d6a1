//! Option contract types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LatticeError;

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum OptionKind {
    /// Right to buy at the strike.
    #[default]
    Call,
    /// Right to sell at the strike.
    Put,
}

impl OptionKind {
    /// Intrinsic value of the option at the given underlying price.
    #[must_use]
    pub fn payoff(&self, price: f64, strike: f64) -> f64 {
        match self {
            OptionKind::Call => (price - strike).max(0.0),
            OptionKind::Put => (strike - price).max(0.0),
        }
    }

    /// Returns the lowercase name used in configs and on the command line.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKind::Call => "call",
            OptionKind::Put => "put",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionKind {
    type Err = LatticeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionKind::Call),
            "put" | "p" => Ok(OptionKind::Put),
            _ => Err(LatticeError::UnsupportedOptionKind(s.to_string())),
        }
    }
}

impl TryFrom<String> for OptionKind {
    type Error = LatticeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OptionKind> for String {
    fn from(kind: OptionKind) -> Self {
        kind.as_str().to_string()
    }
}

/// When the holder may exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum ExerciseStyle {
    /// Exercise at maturity only.
    #[default]
    European,
    /// Exercise at any node up to maturity.
    American,
}

impl ExerciseStyle {
    /// Returns the capitalised name used in configs and on the command line.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseStyle::European => "European",
            ExerciseStyle::American => "American",
        }
    }
}

impl fmt::Display for ExerciseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseStyle {
    type Err = LatticeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "european" | "eu" => Ok(ExerciseStyle::European),
            "american" | "us" => Ok(ExerciseStyle::American),
            _ => Err(LatticeError::UnsupportedExerciseStyle(s.to_string())),
        }
    }
}

impl TryFrom<String> for ExerciseStyle {
    type Error = LatticeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ExerciseStyle> for String {
    fn from(style: ExerciseStyle) -> Self {
        style.as_str().to_string()
    }
}

/// A vanilla option contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Strike price.
    pub strike: f64,
    /// Call or put.
    pub kind: OptionKind,
    /// European or American.
    pub exercise: ExerciseStyle,
}

impl OptionContract {
    /// Creates a new contract.
    #[must_use]
    pub fn new(strike: f64, kind: OptionKind, exercise: ExerciseStyle) -> Self {
        Self {
            strike,
            kind,
            exercise,
        }
    }

    /// Immediate exercise value at the given underlying price.
    #[must_use]
    pub fn payoff(&self, price: f64) -> f64 {
        self.kind.payoff(price, self.strike)
    }

    /// Whether backward induction compares continuation against immediate
    /// exercise. Only American puts are checked; American calls are valued
    /// as European.
    #[must_use]
    pub fn checks_early_exercise(&self) -> bool {
        self.exercise == ExerciseStyle::American && self.kind == OptionKind::Put
    }
}

impl fmt::Display for OptionContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} K={}", self.exercise, self.kind, self.strike)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payoff() {
        assert_eq!(OptionKind::Call.payoff(144.0, 100.0), 44.0);
        assert_eq!(OptionKind::Call.payoff(96.0, 100.0), 0.0);
        assert_eq!(OptionKind::Put.payoff(64.0, 100.0), 36.0);
        assert_eq!(OptionKind::Put.payoff(120.0, 100.0), 0.0);
    }

    #[test]
    fn test_parse_option_kind() {
        assert_eq!("call".parse::<OptionKind>().unwrap(), OptionKind::Call);
        assert_eq!(" PUT ".parse::<OptionKind>().unwrap(), OptionKind::Put);
        assert_eq!(
            "straddle".parse::<OptionKind>(),
            Err(LatticeError::UnsupportedOptionKind("straddle".to_string()))
        );
    }

    #[test]
    fn test_parse_exercise_style() {
        assert_eq!(
            "European".parse::<ExerciseStyle>().unwrap(),
            ExerciseStyle::European
        );
        assert_eq!(
            "american".parse::<ExerciseStyle>().unwrap(),
            ExerciseStyle::American
        );
        assert!(matches!(
            "Bermudan".parse::<ExerciseStyle>(),
            Err(LatticeError::UnsupportedExerciseStyle(_))
        ));
    }

    #[test]
    fn test_serde_uses_names() {
        let json = serde_json::to_string(&OptionKind::Put).unwrap();
        assert_eq!(json, "\"put\"");
        let style: ExerciseStyle = serde_json::from_str("\"American\"").unwrap();
        assert_eq!(style, ExerciseStyle::American);
        assert!(serde_json::from_str::<OptionKind>("\"swaption\"").is_err());
    }

    #[test]
    fn test_early_exercise_only_for_american_puts() {
        let put = OptionContract::new(100.0, OptionKind::Put, ExerciseStyle::American);
        let call = OptionContract::new(100.0, OptionKind::Call, ExerciseStyle::American);
        let euro = OptionContract::new(100.0, OptionKind::Put, ExerciseStyle::European);
        assert!(put.checks_early_exercise());
        assert!(!call.checks_early_exercise());
        assert!(!euro.checks_early_exercise());
    }
}
