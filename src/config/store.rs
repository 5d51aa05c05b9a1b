//! Validated configuration storage
//!
//! [`AuthConfig::build`] turns caller options into a validated configuration
//! handle. [`ConfigStore`] holds one explicitly, and [`set_config`] /
//! [`get_config`] keep one for the whole process.

use crate::config::context::ValidationContext;
use crate::config::settings::{AuthConfig, UserConfig};
use crate::config::validation::validate;
use crate::error::{AuthConfigError, Result};
use crate::utils::redact::redacted_json;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

static GLOBAL_CONFIG: RwLock<Option<Arc<AuthConfig>>> = RwLock::new(None);

impl AuthConfig {
    /// Merge `user` over the defaults and validate the result for `ctx`.
    ///
    /// The supplied options are logged at debug level with secrets redacted
    /// before validation runs.
    pub fn build(user: UserConfig, ctx: &ValidationContext) -> Result<Self> {
        match redacted_json(&user) {
            Ok(json) => debug!(config = %json, "Setting auth config with provided value"),
            Err(e) => debug!("Setting auth config (options not printable: {})", e),
        }

        let merged = Self::merge(user);
        let result = validate(&merged, ctx);
        if !result.is_valid {
            debug!(
                "Auth config rejected for {} context with {} error(s)",
                ctx.execution,
                result.errors.len()
            );
            return Err(AuthConfigError::invalid_configuration(result.errors));
        }
        Ok(merged)
    }
}

/// Holds the validated configuration for one execution context
#[derive(Debug, Clone)]
pub struct ConfigStore {
    context: ValidationContext,
    current: Option<Arc<AuthConfig>>,
}

impl ConfigStore {
    pub fn new(context: ValidationContext) -> Self {
        Self {
            context,
            current: None,
        }
    }

    /// Store for the detected execution context and process environment
    pub fn detect() -> Self {
        Self::new(ValidationContext::detect())
    }

    pub fn context(&self) -> &ValidationContext {
        &self.context
    }

    /// Validate and store `user`. A rejected config leaves the previous
    /// value in place.
    pub fn set(&mut self, user: UserConfig) -> Result<Arc<AuthConfig>> {
        let config = Arc::new(AuthConfig::build(user, &self.context)?);
        self.current = Some(Arc::clone(&config));
        info!("Auth config initialized for {} context", self.context.execution);
        Ok(config)
    }

    pub fn get(&self) -> Result<Arc<AuthConfig>> {
        self.current.clone().ok_or(AuthConfigError::NotInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.current.is_some()
    }
}

/// Validate `user` for the detected context and make it the process-wide config
pub fn set_config(user: UserConfig) -> Result<()> {
    let config = AuthConfig::build(user, &ValidationContext::detect())?;
    *GLOBAL_CONFIG.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(config));
    info!("Auth config initialized");
    Ok(())
}

/// The process-wide config stored by [`set_config`]
pub fn get_config() -> Result<Arc<AuthConfig>> {
    GLOBAL_CONFIG
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .ok_or(AuthConfigError::NotInitialized)
}

/// Forget the process-wide config
pub fn reset_config() {
    *GLOBAL_CONFIG.write().unwrap_or_else(PoisonError::into_inner) = None;
}
