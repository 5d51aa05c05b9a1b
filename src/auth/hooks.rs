//! Callback slots carried by the authentication configuration
//!
//! Handlers supplied in code are stored as closures. Handler keys that come
//! from a deserialized document (TOML, JSON, YAML) cannot hold code, so they
//! are kept as raw values and reported as non-callable during validation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Placeholder emitted when a callable hook is serialized
pub const FUNCTION_PLACEHOLDER: &str = "[function]";

/// Failure passed to the error hooks (token verification, refresh, login, logout)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AuthFailure {
    pub code: Option<String>,
    pub message: String,
}

impl AuthFailure {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code<C: Into<String>, S: Into<String>>(code: C, message: S) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// Payload passed to a token-changed handler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenChange {
    /// Firebase user ID, absent when the user signed out
    pub user_id: Option<String>,
    /// Fresh ID token, absent when the user signed out
    pub id_token: Option<String>,
}

/// A configured callback, or the raw value found where one was expected
pub enum Hook<A: ?Sized> {
    Callable(Arc<dyn Fn(&A) + Send + Sync>),
    NotCallable(Value),
}

pub type ErrorHook = Hook<AuthFailure>;
pub type TokenChangedHook = Hook<TokenChange>;

impl<A: ?Sized> Hook<A> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        Self::Callable(Arc::new(f))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Callable(_))
    }

    /// Whether the slot counts as "set". A raw value only counts when truthy,
    /// so `false`, `0`, `""` and `null` in a document behave like an absent key.
    pub fn is_set(&self) -> bool {
        match self {
            Self::Callable(_) => true,
            Self::NotCallable(value) => is_truthy(value),
        }
    }

    /// Invoke the hook. Returns false when the slot holds no callable.
    pub fn call(&self, arg: &A) -> bool {
        match self {
            Self::Callable(f) => {
                f(arg);
                true
            }
            Self::NotCallable(_) => false,
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl<A: ?Sized> Clone for Hook<A> {
    fn clone(&self) -> Self {
        match self {
            Self::Callable(f) => Self::Callable(Arc::clone(f)),
            Self::NotCallable(value) => Self::NotCallable(value.clone()),
        }
    }
}

impl<A: ?Sized> fmt::Debug for Hook<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callable(_) => f.write_str("Hook(<function>)"),
            Self::NotCallable(value) => write!(f, "Hook(not callable: {})", value),
        }
    }
}

impl<A: ?Sized> Serialize for Hook<A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Callable(_) => serializer.serialize_str(FUNCTION_PLACEHOLDER),
            Self::NotCallable(value) => value.serialize(serializer),
        }
    }
}

impl<'de, A: ?Sized> Deserialize<'de> for Hook<A> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::NotCallable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_callable_hook_invokes_closure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let hook: ErrorHook = Hook::new(move |failure: &AuthFailure| {
            assert_eq!(failure.message, "token expired");
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(hook.is_callable());
        assert!(hook.call(&AuthFailure::with_code("auth/id-token-expired", "token expired")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_deserialized_hook_is_never_callable() {
        let hook: ErrorHook = serde_json::from_value(json!("handleError")).unwrap();
        assert!(!hook.is_callable());
        assert!(hook.is_set());
        assert!(!hook.call(&AuthFailure::new("ignored")));
    }

    #[test]
    fn test_falsy_raw_values_are_not_set() {
        for value in [json!(false), json!(0), json!(""), json!(null)] {
            let hook: TokenChangedHook = Hook::NotCallable(value.clone());
            assert!(!hook.is_set(), "{} should not count as set", value);
        }
        let hook: TokenChangedHook = Hook::NotCallable(json!({}));
        assert!(hook.is_set());
    }

    #[test]
    fn test_callable_serializes_as_placeholder() {
        let hook: TokenChangedHook = Hook::new(|_: &TokenChange| {});
        assert_eq!(serde_json::to_value(&hook).unwrap(), json!(FUNCTION_PLACEHOLDER));
        assert_eq!(format!("{:?}", hook), "Hook(<function>)");
    }
}
