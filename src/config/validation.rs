//! Validation of merged authentication settings
//!
//! Every rule runs and contributes its messages in a fixed order; nothing
//! short-circuits. Rules that only make sense on one side of the
//! client/server split live in [`client_errors`] and [`server_errors`].

use crate::auth::ErrorHook;
use crate::config::context::{ExecutionContext, ValidationContext, EMULATOR_HOST_ENV};
use crate::config::settings::{AuthConfig, CookieKeys};
use std::time::Duration;

/// Longest cookie lifetime Firebase session handling accepts: two weeks
pub const MAX_COOKIE_MAX_AGE: Duration = Duration::from_secs(14 * 24 * 60 * 60);

/// Outcome of validating a merged configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate `config` for the given context
pub fn validate(config: &AuthConfig, ctx: &ValidationContext) -> ValidationResult {
    let mut errors = common_errors(config);
    match ctx.execution {
        ExecutionContext::Client => errors.extend(client_errors(config)),
        ExecutionContext::Server => {
            errors.extend(server_errors(config, ctx.emulator_host_env.as_deref()))
        }
    }
    ValidationResult::from_errors(errors)
}

/// Rules that apply regardless of execution context
pub fn common_errors(config: &AuthConfig) -> Vec<String> {
    let mut errors = token_handler_conflicts(config);

    let has_api_key = config
        .firebase_client_init_config
        .api_key
        .as_deref()
        .is_some_and(|k| !k.is_empty());
    if !has_api_key {
        errors.push(r#"The "firebaseClientInitConfig.apiKey" value is required."#.to_string());
    }

    if let Some(host) = present(&config.firebase_auth_emulator_host) {
        if has_scheme(host) {
            errors.push(
                r#"The "firebaseAuthEmulatorHost" should be set without a prefixed "http://" or "https://", e.g., "localhost:9099"."#
                    .to_string(),
            );
        }
    }

    let hooks: [(&str, &Option<ErrorHook>); 4] = [
        ("onVerifyTokenError", &config.on_verify_token_error),
        ("onTokenRefreshError", &config.on_token_refresh_error),
        ("onLoginRequestError", &config.on_login_request_error),
        ("onLogoutRequestError", &config.on_logout_request_error),
    ];
    for (key, hook) in hooks {
        if hook.as_ref().is_some_and(|h| !h.is_callable()) {
            errors.push(format!(r#"The "{}" setting must be a function."#, key));
        }
    }

    errors
}

/// Rules for configuration bundled into a browser
pub fn client_errors(config: &AuthConfig) -> Vec<String> {
    let mut errors = Vec::new();

    if !config.has_token_changed_handler() {
        if present(&config.login_api_endpoint).is_none() {
            errors.push(r#"The "loginAPIEndpoint" setting is required."#.to_string());
        }
        if present(&config.logout_api_endpoint).is_none() {
            errors.push(r#"The "logoutAPIEndpoint" setting is required."#.to_string());
        }
    }

    let has_private_key = config
        .firebase_admin_init_config
        .as_ref()
        .is_some_and(|admin| admin.has_private_key());
    if has_private_key {
        errors.push(
            r#"The "firebaseAdminInitConfig" private key setting should not be available on the client side."#
                .to_string(),
        );
    }

    if cookie_keys_defined(config.cookies.keys.as_ref()) {
        errors.push(
            r#"The "cookies.keys" setting should not be available on the client side."#.to_string(),
        );
    }

    errors
}

/// Rules for configuration loaded in a server process. `emulator_host_env`
/// is the current value of `FIREBASE_AUTH_EMULATOR_HOST`.
pub fn server_errors(config: &AuthConfig, emulator_host_env: Option<&str>) -> Vec<String> {
    let mut errors = Vec::new();

    if config.cookies.name.is_empty() {
        errors.push(r#"The "cookies.name" setting is required on the server side."#.to_string());
    }

    if let Some(host) = present(&config.firebase_auth_emulator_host) {
        match emulator_host_env.filter(|v| !v.is_empty()) {
            None => errors.push(format!(
                r#"The "{}" environment variable should be set if you are using the "firebaseAuthEmulatorHost" option."#,
                EMULATOR_HOST_ENV
            )),
            Some(env_host) if env_host != host => errors.push(format!(
                r#"The "{}" environment variable should be the same as the host set in the config."#,
                EMULATOR_HOST_ENV
            )),
            Some(_) => {}
        }
    }

    let ceiling = MAX_COOKIE_MAX_AGE.as_millis();
    let max_age = u128::from(config.cookies.max_age);
    if max_age == 0 || max_age > ceiling {
        errors.push(format!(
            r#"The "cookies.maxAge" setting must be less than two weeks ({} ms)."#,
            ceiling
        ));
    }

    errors
}

/// Cookie keys count as defined when a list holds at least one present
/// element, or a single key is non-empty.
pub fn cookie_keys_defined(keys: Option<&CookieKeys>) -> bool {
    keys.is_some_and(CookieKeys::is_defined)
}

fn token_handler_conflicts(config: &AuthConfig) -> Vec<String> {
    let mut errors = Vec::new();
    if !config.has_token_changed_handler() {
        return errors;
    }

    let conflicts = [
        ("loginAPIEndpoint", present(&config.login_api_endpoint).is_some()),
        ("logoutAPIEndpoint", present(&config.logout_api_endpoint).is_some()),
        ("onLoginRequestError", hook_set(&config.on_login_request_error)),
        ("onLogoutRequestError", hook_set(&config.on_logout_request_error)),
    ];
    for (key, is_set) in conflicts {
        if is_set {
            errors.push(format!(
                r#"The "{}" setting should not be set if you are using a "tokenChangedHandler"."#,
                key
            ));
        }
    }
    errors
}

fn hook_set(hook: &Option<ErrorHook>) -> bool {
    hook.as_ref().is_some_and(|h| h.is_set())
}

/// Empty strings count as absent
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn has_scheme(host: &str) -> bool {
    host.contains("://") || host.starts_with("http:") || host.starts_with("https:")
}
