//! Authentication configuration settings
//!
//! This module defines the user-facing option record, the fully defaulted
//! configuration it merges into, and loading of options from files and
//! environment variables.

use crate::auth::{ErrorHook, TokenChangedHook};
use crate::config::context::EnvSource;
use crate::error::{AuthConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Secret string that is wiped from memory on drop
pub type Secret = Zeroizing<String>;

pub const DEFAULT_COOKIE_NAME: &str = "NextFirebaseAuth";

/// Default cookie lifetime: 12 days
pub const DEFAULT_COOKIE_MAX_AGE: Duration = Duration::from_secs(12 * 24 * 60 * 60);

/// Cookie `SameSite` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

/// Cookie signing keys: a single key or a rotation list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CookieKeys {
    Single(Secret),
    List(Vec<Option<Secret>>),
}

impl CookieKeys {
    /// A list counts as defined when at least one element is present; a
    /// single key when it is non-empty.
    pub fn is_defined(&self) -> bool {
        match self {
            Self::Single(key) => !key.is_empty(),
            Self::List(keys) => keys.iter().any(Option::is_some),
        }
    }

    pub fn from_list<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(
            keys.into_iter()
                .map(|k| Some(Zeroizing::new(k.into())))
                .collect(),
        )
    }
}

/// Fully resolved cookie options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieOptions {
    pub name: String,
    pub keys: Option<CookieKeys>,
    pub domain: Option<String>,
    pub http_only: bool,
    /// Lifetime in milliseconds
    pub max_age: u64,
    pub overwrite: bool,
    pub path: String,
    pub same_site: SameSite,
    pub secure: bool,
    pub signed: bool,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.to_string(),
            keys: None,
            domain: None,
            http_only: true,
            max_age: DEFAULT_COOKIE_MAX_AGE.as_millis() as u64,
            overwrite: true,
            path: "/".to_string(),
            same_site: SameSite::Strict,
            secure: true,
            signed: true,
        }
    }
}

impl CookieOptions {
    pub fn max_age_duration(&self) -> Duration {
        Duration::from_millis(self.max_age)
    }
}

/// Cookie options supplied by the caller; each field overrides its default
/// independently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CookieOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<CookieKeys>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overwrite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed: Option<bool>,
}

impl CookieOverrides {
    /// Overlay these overrides onto `base`
    pub fn apply_to(self, base: CookieOptions) -> CookieOptions {
        CookieOptions {
            name: self.name.unwrap_or(base.name),
            keys: self.keys.or(base.keys),
            domain: self.domain.or(base.domain),
            http_only: self.http_only.unwrap_or(base.http_only),
            max_age: self.max_age.unwrap_or(base.max_age),
            overwrite: self.overwrite.unwrap_or(base.overwrite),
            path: self.path.unwrap_or(base.path),
            same_site: self.same_site.unwrap_or(base.same_site),
            secure: self.secure.unwrap_or(base.secure),
            signed: self.signed.unwrap_or(base.signed),
        }
    }
}

/// Service account credential for the Firebase Admin SDK
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdminCredential {
    pub project_id: Option<String>,
    pub client_email: Option<String>,
    pub private_key: Option<Secret>,
}

/// Firebase Admin SDK initialization payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdminInitConfig {
    pub credential: Option<AdminCredential>,
    #[serde(rename = "databaseURL")]
    pub database_url: Option<String>,
}

impl AdminInitConfig {
    pub fn has_private_key(&self) -> bool {
        self.credential
            .as_ref()
            .and_then(|c| c.private_key.as_ref())
            .map(|k| !k.is_empty())
            .unwrap_or(false)
    }
}

/// Firebase JS SDK initialization payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientInitConfig {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    #[serde(rename = "databaseURL")]
    pub database_url: Option<String>,
    pub project_id: Option<String>,
}

/// Options supplied by the caller. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
    #[serde(rename = "authPageURL", skip_serializing_if = "Option::is_none")]
    pub auth_page_url: Option<String>,
    #[serde(rename = "appPageURL", skip_serializing_if = "Option::is_none")]
    pub app_page_url: Option<String>,
    #[serde(rename = "loginAPIEndpoint", skip_serializing_if = "Option::is_none")]
    pub login_api_endpoint: Option<String>,
    #[serde(rename = "logoutAPIEndpoint", skip_serializing_if = "Option::is_none")]
    pub logout_api_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_login_request_error: Option<ErrorHook>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_logout_request_error: Option<ErrorHook>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_changed_handler: Option<TokenChangedHook>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_verify_token_error: Option<ErrorHook>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_token_refresh_error: Option<ErrorHook>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firebase_auth_emulator_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firebase_admin_init_config: Option<AdminInitConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firebase_client_init_config: Option<ClientInitConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<CookieOverrides>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_firebase_admin_default_credential: Option<bool>,
}

/// Fully defaulted configuration used for all runtime decisions
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    pub debug: bool,
    #[serde(rename = "authPageURL")]
    pub auth_page_url: Option<String>,
    #[serde(rename = "appPageURL")]
    pub app_page_url: Option<String>,
    #[serde(rename = "loginAPIEndpoint")]
    pub login_api_endpoint: Option<String>,
    #[serde(rename = "logoutAPIEndpoint")]
    pub logout_api_endpoint: Option<String>,
    pub on_login_request_error: Option<ErrorHook>,
    pub on_logout_request_error: Option<ErrorHook>,
    pub token_changed_handler: Option<TokenChangedHook>,
    pub on_verify_token_error: Option<ErrorHook>,
    pub on_token_refresh_error: Option<ErrorHook>,
    pub firebase_auth_emulator_host: Option<String>,
    pub firebase_admin_init_config: Option<AdminInitConfig>,
    pub firebase_client_init_config: ClientInitConfig,
    pub cookies: CookieOptions,
    pub use_firebase_admin_default_credential: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            debug: false,
            auth_page_url: None,
            app_page_url: None,
            login_api_endpoint: None,
            logout_api_endpoint: None,
            on_login_request_error: None,
            on_logout_request_error: None,
            token_changed_handler: None,
            on_verify_token_error: None,
            on_token_refresh_error: None,
            firebase_auth_emulator_host: None,
            firebase_admin_init_config: None,
            firebase_client_init_config: ClientInitConfig::default(),
            cookies: CookieOptions::default(),
            use_firebase_admin_default_credential: false,
        }
    }
}

impl AuthConfig {
    /// Shallow merge of `user` over the defaults. Cookie options merge
    /// field by field; every other field is taken whole from whichever side
    /// provides it.
    pub fn merge(user: UserConfig) -> Self {
        let defaults = Self::default();
        let cookies = match user.cookies {
            Some(overrides) => overrides.apply_to(defaults.cookies),
            None => defaults.cookies,
        };

        Self {
            debug: user.debug.unwrap_or(defaults.debug),
            auth_page_url: user.auth_page_url.or(defaults.auth_page_url),
            app_page_url: user.app_page_url.or(defaults.app_page_url),
            login_api_endpoint: user.login_api_endpoint.or(defaults.login_api_endpoint),
            logout_api_endpoint: user.logout_api_endpoint.or(defaults.logout_api_endpoint),
            on_login_request_error: user
                .on_login_request_error
                .or(defaults.on_login_request_error),
            on_logout_request_error: user
                .on_logout_request_error
                .or(defaults.on_logout_request_error),
            token_changed_handler: user.token_changed_handler.or(defaults.token_changed_handler),
            on_verify_token_error: user.on_verify_token_error.or(defaults.on_verify_token_error),
            on_token_refresh_error: user
                .on_token_refresh_error
                .or(defaults.on_token_refresh_error),
            firebase_auth_emulator_host: user
                .firebase_auth_emulator_host
                .or(defaults.firebase_auth_emulator_host),
            firebase_admin_init_config: user
                .firebase_admin_init_config
                .or(defaults.firebase_admin_init_config),
            firebase_client_init_config: user
                .firebase_client_init_config
                .unwrap_or(defaults.firebase_client_init_config),
            cookies,
            use_firebase_admin_default_credential: user
                .use_firebase_admin_default_credential
                .unwrap_or(defaults.use_firebase_admin_default_credential),
        }
    }

    /// Whether a token-changed handler replaces the login/logout endpoint flow
    pub fn has_token_changed_handler(&self) -> bool {
        self.token_changed_handler
            .as_ref()
            .map(|h| h.is_set())
            .unwrap_or(false)
    }

    pub fn cookie_max_age(&self) -> Duration {
        self.cookies.max_age_duration()
    }
}

impl UserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a TOML, JSON or YAML file
    pub async fn load(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            AuthConfigError::config_load(format!("Failed to read {}: {}", path.display(), e))
        })?;
        debug!("Loaded auth options from: {}", path.display());
        Self::parse(path, &contents)
    }

    /// Parse options, choosing the format by file extension. Unknown
    /// extensions are tried as TOML first, then JSON.
    pub fn parse(path: &Path, contents: &str) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => Ok(serde_json::from_str(contents)?),
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(contents)?),
            Some("toml") => Ok(toml::from_str(contents)?),
            _ => {
                if let Ok(config) = toml::from_str::<Self>(contents) {
                    return Ok(config);
                }
                Ok(serde_json::from_str(contents)?)
            }
        }
    }

    /// Override options from `FIREBASE_AUTH_*` environment variables
    pub fn apply_env_overrides(&mut self, env: &dyn EnvSource) {
        if let Some(value) = env.var("FIREBASE_AUTH_DEBUG") {
            match parse_bool(&value) {
                Some(debug) => self.debug = Some(debug),
                None => warn!("Invalid FIREBASE_AUTH_DEBUG: {}", value),
            }
        }

        if let Some(api_key) = env.var("FIREBASE_AUTH_API_KEY") {
            debug!("Env override: firebaseClientInitConfig.apiKey");
            self.firebase_client_init_config
                .get_or_insert_with(ClientInitConfig::default)
                .api_key = Some(api_key);
        }

        if let Some(name) = env.var("FIREBASE_AUTH_COOKIE_NAME") {
            debug!(cookie_name = %name, "Env override: cookies.name");
            self.cookies.get_or_insert_with(CookieOverrides::default).name = Some(name);
        }

        if let Some(keys) = env.var("FIREBASE_AUTH_COOKIE_KEYS") {
            debug!("Env override: cookies.keys");
            let keys = Zeroizing::new(keys);
            let list: Vec<&str> = keys
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .collect();
            self.cookies.get_or_insert_with(CookieOverrides::default).keys =
                Some(CookieKeys::from_list(list));
        }

        let project_id = env.var("FIREBASE_AUTH_ADMIN_PROJECT_ID");
        let client_email = env.var("FIREBASE_AUTH_ADMIN_CLIENT_EMAIL");
        let private_key = env.var("FIREBASE_AUTH_ADMIN_PRIVATE_KEY");
        if project_id.is_some() || client_email.is_some() || private_key.is_some() {
            debug!("Env override: firebaseAdminInitConfig.credential");
            let credential = self
                .firebase_admin_init_config
                .get_or_insert_with(AdminInitConfig::default)
                .credential
                .get_or_insert_with(AdminCredential::default);
            if project_id.is_some() {
                credential.project_id = project_id;
            }
            if client_email.is_some() {
                credential.client_email = client_email;
            }
            if let Some(key) = private_key {
                // Keys pasted into env files usually carry escaped newlines
                let key = Zeroizing::new(key);
                credential.private_key = Some(Zeroizing::new(key.replace("\\n", "\n")));
            }
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
