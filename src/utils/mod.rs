//! Utility functions module
//!
//! This module contains helpers shared by the library and the CLI,
//! currently redaction of secrets before configuration is logged or shown.

pub mod redact;

pub use redact::*;
