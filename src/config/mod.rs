//! Configuration management module
//!
//! This module merges caller-supplied authentication options with defaults,
//! validates the result for the current execution context, and stores the
//! validated configuration.

pub mod context;
pub mod settings;
pub mod store;
pub mod validation;

pub use context::*;
pub use settings::*;
pub use store::*;
pub use validation::*;
