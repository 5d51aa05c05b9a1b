use thiserror::Error;

/// Main error type for firebase-auth-config operations
#[derive(Debug, Error)]
pub enum AuthConfigError {
    #[error("Invalid firebase-auth options: {}", .errors.join(" "))]
    InvalidConfiguration { errors: Vec<String> },

    #[error("firebase-auth must be initialized before use: call set_config first")]
    NotInitialized,

    #[error("Configuration loading error: {0}")]
    ConfigLoadError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl AuthConfigError {
    pub fn invalid_configuration(errors: Vec<String>) -> Self {
        Self::InvalidConfiguration { errors }
    }

    pub fn config_load<S: Into<String>>(msg: S) -> Self {
        Self::ConfigLoadError(msg.into())
    }

    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Individual rule violations, if this is a validation failure
    pub fn validation_errors(&self) -> Option<&[String]> {
        match self {
            Self::InvalidConfiguration { errors } => Some(errors),
            _ => None,
        }
    }
}

/// Result type alias for firebase-auth-config operations
pub type Result<T> = std::result::Result<T, AuthConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_message_joins_errors() {
        let err = AuthConfigError::invalid_configuration(vec![
            "first problem.".to_string(),
            "second problem.".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Invalid firebase-auth options: first problem. second problem."
        );
        assert_eq!(err.validation_errors().map(|e| e.len()), Some(2));
    }

    #[test]
    fn test_not_initialized_is_distinct() {
        let err = AuthConfigError::NotInitialized;
        assert!(err.to_string().contains("must be initialized"));
        assert!(err.validation_errors().is_none());
    }
}
