//! CLI module for fbauth
//!
//! This module contains the command-line interface for linting and
//! inspecting authentication configuration files.

pub mod commands;

pub use commands::*;
