//! Contract and model types shared by the engine and its callers.

mod model;
mod option;

pub use model::PricingModel;
pub use option::{ExerciseStyle, OptionContract, OptionKind};
