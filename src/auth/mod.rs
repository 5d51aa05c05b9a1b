//! Authentication integration types
//!
//! This module holds the callback hooks the authentication integration
//! invokes on token changes and on request or verification failures.

pub mod hooks;

pub use hooks::*;
