//! Configuration validation tests
//!
//! Tests for merge and validation behaviour through the public API,
//! covering both execution contexts.

use firebase_auth_config::auth::{AuthFailure, Hook, TokenChange};
use firebase_auth_config::config::{
    AuthConfig, ClientInitConfig, CookieKeys, CookieOverrides, UserConfig, ValidationContext,
    MAX_COOKIE_MAX_AGE,
};
use firebase_auth_config::AuthConfigError;

const DAY_MS: u64 = 24 * 60 * 60 * 1000;

fn base_user_config() -> UserConfig {
    UserConfig {
        firebase_client_init_config: Some(ClientInitConfig {
            api_key: Some("public-api-key".to_string()),
            auth_domain: Some("my-app.firebaseapp.com".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn errors_for(user: UserConfig, ctx: &ValidationContext) -> Vec<String> {
    match AuthConfig::build(user, ctx) {
        Ok(_) => Vec::new(),
        Err(AuthConfigError::InvalidConfiguration { errors }) => errors,
        Err(other) => panic!("unexpected error: {}", other),
    }
}

#[cfg(test)]
mod api_key_tests {
    use super::*;

    #[test]
    fn test_missing_api_key_rejected_in_every_context() {
        let contexts = vec![
            ValidationContext::client(),
            ValidationContext::server(None),
            ValidationContext::server(Some("localhost:9099".to_string())),
        ];

        for ctx in contexts {
            let user = UserConfig {
                login_api_endpoint: Some("/api/login".to_string()),
                logout_api_endpoint: Some("/api/logout".to_string()),
                ..Default::default()
            };
            let err = AuthConfig::build(user, &ctx).unwrap_err();
            assert!(
                err.to_string().contains("firebaseClientInitConfig.apiKey"),
                "context {:?}: {}",
                ctx.execution,
                err
            );
        }
    }

    #[test]
    fn test_empty_api_key_counts_as_missing() {
        let user = UserConfig {
            firebase_client_init_config: Some(ClientInitConfig {
                api_key: Some(String::new()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let errors = errors_for(user, &ValidationContext::server(None));
        assert_eq!(errors.len(), 1);
    }
}

#[cfg(test)]
mod token_handler_tests {
    use super::*;

    #[test]
    fn test_token_handler_conflicts_with_login_endpoint() {
        let contexts = vec![ValidationContext::client(), ValidationContext::server(None)];
        for ctx in contexts {
            let user = UserConfig {
                token_changed_handler: Some(Hook::new(|_: &TokenChange| {})),
                login_api_endpoint: Some("/api/login".to_string()),
                ..base_user_config()
            };
            let err = AuthConfig::build(user, &ctx).unwrap_err();
            let message = err.to_string();
            assert!(message.starts_with("Invalid firebase-auth options: "));
            assert!(message.contains(
                r#"The "loginAPIEndpoint" setting should not be set if you are using a "tokenChangedHandler"."#
            ));
        }
    }

    #[test]
    fn test_token_handler_alone_is_valid_on_client() {
        let user = UserConfig {
            token_changed_handler: Some(Hook::new(|_: &TokenChange| {})),
            ..base_user_config()
        };
        assert!(errors_for(user, &ValidationContext::client()).is_empty());
    }

    #[test]
    fn test_request_error_hooks_conflict_with_token_handler() {
        let user = UserConfig {
            token_changed_handler: Some(Hook::new(|_: &TokenChange| {})),
            on_login_request_error: Some(Hook::new(|_: &AuthFailure| {})),
            on_logout_request_error: Some(Hook::new(|_: &AuthFailure| {})),
            ..base_user_config()
        };
        let errors = errors_for(user, &ValidationContext::server(None));
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("onLoginRequestError"));
        assert!(errors[1].contains("onLogoutRequestError"));
    }
}

#[cfg(test)]
mod client_context_tests {
    use super::*;

    #[test]
    fn test_client_without_endpoints_or_handler() {
        let errors = errors_for(base_user_config(), &ValidationContext::client());
        let endpoint_errors: Vec<&String> =
            errors.iter().filter(|e| e.contains("is required.")).collect();
        assert_eq!(endpoint_errors.len(), 2);
        assert!(endpoint_errors[0].contains("loginAPIEndpoint"));
        assert!(endpoint_errors[1].contains("logoutAPIEndpoint"));
    }

    #[test]
    fn test_client_rejects_cookie_keys() {
        let user = UserConfig {
            login_api_endpoint: Some("/api/login".to_string()),
            logout_api_endpoint: Some("/api/logout".to_string()),
            cookies: Some(CookieOverrides {
                keys: Some(CookieKeys::from_list(["k1"])),
                ..Default::default()
            }),
            ..base_user_config()
        };
        let errors = errors_for(user, &ValidationContext::client());
        assert_eq!(
            errors,
            vec![r#"The "cookies.keys" setting should not be available on the client side."#]
        );
    }
}

#[cfg(test)]
mod server_context_tests {
    use super::*;

    fn with_max_age(max_age: u64) -> UserConfig {
        UserConfig {
            cookies: Some(CookieOverrides {
                max_age: Some(max_age),
                ..Default::default()
            }),
            ..base_user_config()
        }
    }

    #[test]
    fn test_max_age_over_two_weeks_rejected() {
        let err = AuthConfig::build(with_max_age(15 * DAY_MS), &ValidationContext::server(None))
            .unwrap_err();
        assert!(err.to_string().contains("less than two weeks"));
    }

    #[test]
    fn test_max_age_of_exactly_two_weeks_accepted() {
        let two_weeks: u64 = 14 * 60 * 60 * 24 * 1000;
        assert_eq!(u128::from(two_weeks), MAX_COOKIE_MAX_AGE.as_millis());
        let config = AuthConfig::build(with_max_age(two_weeks), &ValidationContext::server(None))
            .unwrap();
        assert_eq!(config.cookies.max_age, two_weeks);
    }

    #[test]
    fn test_emulator_host_env_unset_mismatched_and_matching() {
        let user = || UserConfig {
            firebase_auth_emulator_host: Some("localhost:9099".to_string()),
            ..base_user_config()
        };

        let unset = errors_for(user(), &ValidationContext::server(None));
        assert_eq!(unset.len(), 1);
        assert!(unset[0].contains("FIREBASE_AUTH_EMULATOR_HOST"));
        assert!(unset[0].contains("should be set"));

        let mismatched = errors_for(
            user(),
            &ValidationContext::server(Some("127.0.0.1:9099".to_string())),
        );
        assert_eq!(mismatched.len(), 1);
        assert!(mismatched[0].contains("should be the same"));

        let matching = errors_for(
            user(),
            &ValidationContext::server(Some("localhost:9099".to_string())),
        );
        assert!(matching.is_empty());
    }

    #[test]
    fn test_server_allows_secrets() {
        let user = UserConfig {
            cookies: Some(CookieOverrides {
                keys: Some(CookieKeys::from_list(["k1", "k2"])),
                ..Default::default()
            }),
            ..base_user_config()
        };
        assert!(errors_for(user, &ValidationContext::server(None)).is_empty());
    }
}

#[cfg(test)]
mod ordering_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_errors_follow_rule_order() {
        let user = UserConfig {
            token_changed_handler: Some(Hook::new(|_: &TokenChange| {})),
            logout_api_endpoint: Some("/api/logout".to_string()),
            firebase_auth_emulator_host: Some("http://localhost:9099".to_string()),
            on_token_refresh_error: Some(Hook::NotCallable(json!("refresh"))),
            cookies: Some(CookieOverrides {
                name: Some(String::new()),
                max_age: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };

        let errors = errors_for(user, &ValidationContext::server(None));
        let expected_fragments = [
            "logoutAPIEndpoint",
            "apiKey",
            "firebaseAuthEmulatorHost",
            "onTokenRefreshError",
            "cookies.name",
            "environment variable should be set",
            "cookies.maxAge",
        ];
        assert_eq!(errors.len(), expected_fragments.len(), "{:#?}", errors);
        for (error, fragment) in errors.iter().zip(expected_fragments) {
            assert!(error.contains(fragment), "'{}' should mention '{}'", error, fragment);
        }
    }
}
