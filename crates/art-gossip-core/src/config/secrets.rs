//! Secret resolution: `${ENV_VAR}` references in config become concrete values.

use crate::error::ConfigError;

use super::{Config, EnrichmentMode};

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    let resolved = if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok()
    } else {
        Some(value.to_string())
    };
    resolved.filter(|v| !v.trim().is_empty())
}

/// Platform account credentials.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Every secret the run needs, resolved once at startup.
#[derive(Clone)]
pub struct Secrets {
    pub credentials: Credentials,
    /// Present only when the run uses generative enrichment
    pub llm_api_key: Option<String>,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("credentials", &self.credentials)
            .field("llm_api_key", &self.llm_api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Config {
    /// Resolve every secret required for a run in `mode`.
    ///
    /// Fails before any network call if a required value is missing.
    pub fn resolve_secrets(&self, mode: EnrichmentMode) -> Result<Secrets, ConfigError> {
        let username =
            resolve_env_var(&self.platform.username).ok_or_else(|| ConfigError::MissingSecret {
                name: "platform.username",
                hint: format!("Set it in config or via {}.", self.platform.username),
            })?;
        let password =
            resolve_env_var(&self.platform.password).ok_or_else(|| ConfigError::MissingSecret {
                name: "platform.password",
                hint: format!("Set it in config or via {}.", self.platform.password),
            })?;

        let llm_api_key = match mode {
            EnrichmentMode::Cache => None,
            EnrichmentMode::Generative => Some(resolve_env_var(&self.llm.api_key).ok_or_else(
                || ConfigError::MissingSecret {
                    name: "llm.api_key",
                    hint: format!(
                        "Generative mode needs a text-generation key ({}).",
                        self.llm.api_key
                    ),
                },
            )?),
        };

        Ok(Secrets {
            credentials: Credentials { username, password },
            llm_api_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_literals() -> Config {
        let mut config = Config::default();
        config.platform.username = "artgossip".to_string();
        config.platform.password = "hunter2".to_string();
        config.llm.api_key = "sk-test".to_string();
        config
    }

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }

    #[test]
    fn test_cache_mode_does_not_need_llm_key() {
        let mut config = config_with_literals();
        config.llm.api_key = "${DEFINITELY_NOT_SET_XYZ_456}".to_string();

        let secrets = config.resolve_secrets(EnrichmentMode::Cache).unwrap();
        assert_eq!(secrets.credentials.username, "artgossip");
        assert!(secrets.llm_api_key.is_none());
    }

    #[test]
    fn test_generative_mode_requires_llm_key() {
        let mut config = config_with_literals();
        config.llm.api_key = "${DEFINITELY_NOT_SET_XYZ_456}".to_string();

        let err = config
            .resolve_secrets(EnrichmentMode::Generative)
            .unwrap_err();
        match err {
            ConfigError::MissingSecret { name, .. } => assert_eq!(name, "llm.api_key"),
            other => panic!("expected MissingSecret, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_username_is_fatal() {
        let mut config = config_with_literals();
        config.platform.username = "${DEFINITELY_NOT_SET_XYZ_789}".to_string();

        let err = config.resolve_secrets(EnrichmentMode::Cache).unwrap_err();
        assert!(err.to_string().contains("platform.username"));
    }

    #[test]
    fn test_debug_redacts_password_and_key() {
        let secrets = config_with_literals()
            .resolve_secrets(EnrichmentMode::Generative)
            .unwrap();
        let debug = format!("{secrets:?}");
        assert!(debug.contains("artgossip"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("sk-test"));
    }
}
