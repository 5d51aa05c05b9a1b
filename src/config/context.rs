//! Execution context detection
//!
//! Validation rules differ between code running in a browser (client) and
//! code running in a server process. This module decides which side we are on
//! and captures the environment values the server-side rules compare against.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable the Firebase Admin SDK reads to find the auth emulator
pub const EMULATOR_HOST_ENV: &str = "FIREBASE_AUTH_EMULATOR_HOST";

/// Where the configuration is being applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionContext {
    /// Browser bundle
    Client,
    /// Server process
    Server,
}

impl ExecutionContext {
    /// Browser builds target wasm32; everything else is a server process.
    pub fn detect() -> Self {
        if cfg!(target_arch = "wasm32") {
            Self::Client
        } else {
            Self::Server
        }
    }

    pub fn is_client(self) -> bool {
        self == Self::Client
    }
}

impl std::fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Client => write!(f, "client"),
            Self::Server => write!(f, "server"),
        }
    }
}

/// Source of environment variables
#[cfg_attr(test, mockall::automock)]
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads variables from the current process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Everything outside the configuration itself that validation depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationContext {
    pub execution: ExecutionContext,
    /// Value of `FIREBASE_AUTH_EMULATOR_HOST` at validation time
    pub emulator_host_env: Option<String>,
}

impl ValidationContext {
    pub fn new(execution: ExecutionContext, emulator_host_env: Option<String>) -> Self {
        Self {
            execution,
            emulator_host_env,
        }
    }

    /// Client context. The emulator variable is never consulted on the client.
    pub fn client() -> Self {
        Self::new(ExecutionContext::Client, None)
    }

    pub fn server(emulator_host_env: Option<String>) -> Self {
        Self::new(ExecutionContext::Server, emulator_host_env)
    }

    /// Build a context for `execution`, reading the emulator host from `env`.
    /// Empty values are treated as unset.
    pub fn from_env(execution: ExecutionContext, env: &dyn EnvSource) -> Self {
        let emulator_host_env = env.var(EMULATOR_HOST_ENV).filter(|v| !v.is_empty());
        debug!(
            "Validation context: {} (emulator host env {})",
            execution,
            if emulator_host_env.is_some() { "set" } else { "unset" }
        );
        Self::new(execution, emulator_host_env)
    }

    /// Detect the execution context and read the process environment
    pub fn detect() -> Self {
        Self::from_env(ExecutionContext::detect(), &ProcessEnv)
    }
}
