//! firebase-auth-config - authentication configuration for Firebase integrations
//!
//! Merges caller-supplied options with defaults, validates them for the
//! client or server execution context, and stores the validated result
//! either in an explicit [`config::ConfigStore`] or process-wide via
//! [`config::set_config`] and [`config::get_config`].

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod utils;

// Re-export commonly used types
pub use config::{
    get_config, set_config, AuthConfig, ConfigStore, ExecutionContext, UserConfig,
    ValidationContext, ValidationResult,
};
pub use error::{AuthConfigError, Result};
