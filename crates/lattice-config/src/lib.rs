//! Lattice Configuration Layer
//!
//! Serializable pricing configurations for the lattice engine, loaded from
//! TOML or JSON files and validated before an engine is built.
//!
//! # Example
//!
//! ```rust
//! use lattice_config::{PricingConfig, Validate};
//!
//! let config = PricingConfig::new("ATM.CALL").with_schedule(1.0, 200);
//! assert!(config.is_valid());
//!
//! let mut engine = config.build_engine().unwrap();
//! let value = engine.price().unwrap();
//! assert!(value > 10.0 && value < 11.0);
//! ```
//!
//! # File format
//!
//! ```toml
//! name = "HULL.AMERICAN.PUT"
//! spot = 50.0
//! strike = 52.0
//! rate = 5.0
//! maturity = 2.0
//! steps = 2
//! up_factor = 1.2
//! down_factor = 0.8
//! option = "put"
//! exercise = "American"
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod loader;
mod pricing;

pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use loader::ConfigFormat;
pub use pricing::PricingConfig;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{ConfigError, ConfigResult, Validate};
    pub use crate::loader::ConfigFormat;
    pub use crate::pricing::PricingConfig;
}
