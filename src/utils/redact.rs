//! Redaction of secrets before configuration is logged or printed

use crate::config::settings::{AdminInitConfig, AuthConfig, CookieKeys, UserConfig};
use crate::error::{AuthConfigError, Result};
use zeroize::Zeroizing;

/// Value substituted for every redacted secret
pub const REDACTED: &str = "hidden";

fn redacted_keys() -> CookieKeys {
    CookieKeys::List(vec![Some(Zeroizing::new(REDACTED.to_string()))])
}

fn redact_admin(admin: &AdminInitConfig) -> AdminInitConfig {
    let mut admin = admin.clone();
    if let Some(credential) = admin.credential.as_mut() {
        credential.private_key = Some(Zeroizing::new(REDACTED.to_string()));
        credential.client_email = Some(REDACTED.to_string());
    }
    admin
}

impl UserConfig {
    /// Copy with cookie keys and admin credential secrets replaced by placeholders.
    /// Supplied cookie options always report a placeholder key list, so the log
    /// does not reveal whether keys were set.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if let Some(cookies) = copy.cookies.as_mut() {
            cookies.keys = Some(redacted_keys());
        }
        if let Some(admin) = self.firebase_admin_init_config.as_ref() {
            copy.firebase_admin_init_config = Some(redact_admin(admin));
        }
        copy
    }
}

impl AuthConfig {
    /// Copy safe to print: configured cookie keys and admin credential secrets
    /// are replaced by placeholders.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.cookies.keys.is_some() {
            copy.cookies.keys = Some(redacted_keys());
        }
        if let Some(admin) = self.firebase_admin_init_config.as_ref() {
            copy.firebase_admin_init_config = Some(redact_admin(admin));
        }
        copy
    }
}

/// Serialize a user config for the debug log with secrets redacted
pub fn redacted_json(config: &UserConfig) -> Result<String> {
    serde_json::to_string(&config.redacted())
        .map_err(|e| AuthConfigError::serialization(format!("Failed to serialize options: {}", e)))
}
