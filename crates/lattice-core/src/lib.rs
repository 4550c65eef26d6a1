//! # Lattice Core
//!
//! Cox-Ross-Rubinstein binomial lattice valuation of vanilla options.
//!
//! This crate provides:
//!
//! - **Engine**: [`LatticeEngine`] builds the lattice forward and values it
//!   by backward induction, with early exercise for American puts
//! - **Lattice**: a recombining triangular arena indexed by `(depth, ups)`
//! - **Levels**: a read-only level-by-level projection and hedge ratios
//! - **Analytic**: closed-form Black-Scholes-Merton reference prices
//!
//! ## Design
//!
//! - Parameters are derived and checked for arbitrage once, at configuration
//! - Memory and time are `O(steps²)`; see [`MAX_STEPS`]
//! - Every misuse surfaces as a typed [`LatticeError`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::unreadable_literal)]

pub mod analytic;
pub mod engine;
pub mod error;
pub mod lattice;
pub mod levels;
pub mod parameters;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::analytic::{black_scholes, norm_cdf, parity_forward};
    pub use crate::engine::{LatticeEngine, LatticeEngineBuilder, Stage};
    pub use crate::error::{LatticeError, LatticeResult};
    pub use crate::lattice::{Lattice, Node};
    pub use crate::levels::{hedge_ratios, root_delta, Level, LevelEntry};
    pub use crate::parameters::{LatticeParameters, MarketInputs, MAX_STEPS};
    pub use crate::types::{ExerciseStyle, OptionContract, OptionKind, PricingModel};
}

pub use engine::{LatticeEngine, LatticeEngineBuilder, Stage};
pub use error::{LatticeError, LatticeResult};
pub use lattice::{Lattice, Node};
pub use levels::{Level, LevelEntry};
pub use parameters::{LatticeParameters, MarketInputs, MAX_STEPS};
pub use types::{ExerciseStyle, OptionContract, OptionKind, PricingModel};
