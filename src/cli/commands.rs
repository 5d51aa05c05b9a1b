//! CLI commands and argument parsing
//!
//! This module defines the command-line interface structure using clap
//! and the handlers behind each command.

use crate::config::{
    validate, AuthConfig, ExecutionContext, ProcessEnv, UserConfig, ValidationContext,
    ValidationResult, EMULATOR_HOST_ENV,
};
use crate::error::{AuthConfigError, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "fbauth")]
#[command(about = "Lint and inspect Firebase auth configuration files")]
#[command(version, author)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a configuration file
    Check {
        /// Configuration file (TOML, JSON or YAML)
        file: PathBuf,
        /// Execution context to validate for
        #[arg(long, value_enum, default_value = "server")]
        context: ExecutionContext,
        /// Emulator host the server process will see
        #[arg(long, value_name = "HOST", env = EMULATOR_HOST_ENV)]
        emulator_host: Option<String>,
        /// Ignore FIREBASE_AUTH_* environment overrides
        #[arg(long)]
        no_env: bool,
    },
    /// Print the merged configuration with secrets redacted
    Show {
        /// Configuration file (TOML, JSON or YAML)
        file: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
        /// Ignore FIREBASE_AUTH_* environment overrides
        #[arg(long)]
        no_env: bool,
    },
    /// Print the default configuration
    Defaults {
        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Toml,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Check {
                file,
                context,
                emulator_host,
                no_env,
            } => execute_check_direct(&file, context, emulator_host, no_env).await,
            Commands::Show {
                file,
                format,
                no_env,
            } => execute_show_direct(&file, format, no_env).await,
            Commands::Defaults { format } => {
                println!("{}", render(&AuthConfig::default(), format)?);
                Ok(())
            }
        }
    }
}

async fn execute_check_direct(
    file: &Path,
    context: ExecutionContext,
    emulator_host: Option<String>,
    no_env: bool,
) -> Result<()> {
    let ctx = ValidationContext::new(context, emulator_host);
    let user = load_user_config(file, no_env).await?;
    let result = check(user, &ctx);

    if result.is_valid {
        println!("Configuration is valid for {} context", context);
        return Ok(());
    }

    println!("Configuration is invalid for {} context:", context);
    for error in &result.errors {
        println!("  - {}", error);
    }
    Err(AuthConfigError::invalid_configuration(result.errors))
}

async fn execute_show_direct(file: &Path, format: OutputFormat, no_env: bool) -> Result<()> {
    let user = load_user_config(file, no_env).await?;
    let merged = AuthConfig::merge(user).redacted();
    println!("{}", render(&merged, format)?);
    Ok(())
}

/// Merge and validate without storing
pub fn check(user: UserConfig, ctx: &ValidationContext) -> ValidationResult {
    let merged = AuthConfig::merge(user);
    let result = validate(&merged, ctx);
    info!(
        "Validated config for {} context: {} error(s)",
        ctx.execution,
        result.errors.len()
    );
    result
}

async fn load_user_config(file: &Path, no_env: bool) -> Result<UserConfig> {
    let mut user = UserConfig::load(file).await?;
    if no_env {
        debug!("Skipping environment overrides");
    } else {
        user.apply_env_overrides(&ProcessEnv);
    }
    Ok(user)
}

/// Serialize `value` in the requested format
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        OutputFormat::Toml => toml::to_string_pretty(value)
            .map_err(|e| AuthConfigError::serialization(e.to_string())),
    }
}
