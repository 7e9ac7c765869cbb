//! Client configuration with environment overrides. Defaults describe the
//! inventory API; `STOCKPATH_API_URL` and `STOCKPATH_TIMEOUT_SECS` replace them
//! at runtime. Configuration values are public; do not store secrets here.

use crate::router::LOGIN_ROUTE;
use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
/// Default request timeout applied to every call, refreshes included.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const REFRESH_PATH: &str = "/api/refresh-token";
pub const LOGIN_PATH: &str = "/api/login";
pub const REGISTER_PATH: &str = "/api/register";
pub const FORGOT_PASSWORD_PATH: &str = "/api/forgot-password";
pub const RESET_PASSWORD_PATH: &str = "/api/reset-password";

/// Endpoints that never trigger a credential refresh.
pub const EXEMPT_PATHS: [&str; 4] = [
    LOGIN_PATH,
    REGISTER_PATH,
    FORGOT_PASSWORD_PATH,
    RESET_PASSWORD_PATH,
];

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub refresh_path: String,
    pub exempt_paths: Vec<String>,
    pub login_route: String,
}

impl ClientConfig {
    /// # Errors
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .with_context(|| format!("invalid API base URL: {base_url}"))?;

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            refresh_path: REFRESH_PATH.to_string(),
            exempt_paths: EXEMPT_PATHS.iter().map(ToString::to_string).collect(),
            login_route: LOGIN_ROUTE.to_string(),
        })
    }

    /// Loads defaults and applies environment overrides.
    ///
    /// # Errors
    /// Returns an error if an override is present but malformed.
    pub fn from_env() -> Result<Self> {
        let overrides = Overrides {
            api_url: read_env("STOCKPATH_API_URL"),
            timeout_secs: read_env("STOCKPATH_TIMEOUT_SECS"),
        };

        let mut config = Self::new(DEFAULT_API_URL)?;
        apply_overrides(&mut config, overrides)?;
        Ok(config)
    }

    /// True when `path` names one of the unauthenticated endpoints.
    #[must_use]
    pub fn is_exempt(&self, path: &str) -> bool {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        self.exempt_paths
            .iter()
            .any(|exempt| path.ends_with(exempt.as_str()))
    }

    /// Joins `path` onto the base URL, keeping any base path prefix.
    ///
    /// # Errors
    /// Returns an error if the joined URL is invalid.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim();
        Url::parse(&format!("{}/{}", base, path.trim_start_matches('/')))
    }
}

#[derive(Default)]
struct Overrides {
    api_url: Option<String>,
    timeout_secs: Option<String>,
}

fn apply_overrides(config: &mut ClientConfig, overrides: Overrides) -> Result<()> {
    if let Some(value) = overrides.api_url {
        config.base_url =
            Url::parse(&value).with_context(|| format!("invalid STOCKPATH_API_URL: {value}"))?;
    }
    if let Some(value) = overrides.timeout_secs {
        let secs = value
            .parse::<u64>()
            .with_context(|| format!("invalid STOCKPATH_TIMEOUT_SECS: {value}"))?;
        config.timeout = Duration::from_secs(secs);
    }
    Ok(())
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|value| normalize_value(&value))
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalize_value_trims_and_rejects_empty() {
        assert_eq!(normalize_value(""), None);
        assert_eq!(normalize_value("   "), None);
        assert_eq!(
            normalize_value("  https://api.stockpath.dev "),
            Some("https://api.stockpath.dev".to_string())
        );
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::new(DEFAULT_API_URL).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.refresh_path, "/api/refresh-token");
        assert_eq!(config.login_route, "/login");
        assert_eq!(config.exempt_paths.len(), 4);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(ClientConfig::new("not a url").is_err());
    }

    #[test]
    fn exempt_matches_by_suffix() {
        let config = ClientConfig::new(DEFAULT_API_URL).unwrap();
        assert!(config.is_exempt("/api/login"));
        assert!(config.is_exempt("http://localhost:8000/api/register"));
        assert!(config.is_exempt("/api/reset-password?token=x"));
        assert!(config.is_exempt("/api/forgot-password"));
        assert!(!config.is_exempt("/api/products"));
        assert!(!config.is_exempt("/api/login/history"));
    }

    #[test]
    fn endpoint_keeps_base_prefix() {
        let config = ClientConfig::new("https://erp.example.com/backend/").unwrap();
        assert_eq!(
            config.endpoint("/api/products").unwrap().as_str(),
            "https://erp.example.com/backend/api/products"
        );
        assert_eq!(
            config.endpoint("api/products?page=2").unwrap().as_str(),
            "https://erp.example.com/backend/api/products?page=2"
        );
    }

    #[test]
    fn from_env_applies_overrides() {
        temp_env::with_vars(
            [
                ("STOCKPATH_API_URL", Some(" https://api.override ")),
                ("STOCKPATH_TIMEOUT_SECS", Some("3")),
            ],
            || {
                let config = ClientConfig::from_env().unwrap();
                assert_eq!(config.base_url.as_str(), "https://api.override/");
                assert_eq!(config.timeout, Duration::from_secs(3));
            },
        );
    }

    #[test]
    fn from_env_ignores_empty_values() {
        temp_env::with_vars(
            [
                ("STOCKPATH_API_URL", Some("  ")),
                ("STOCKPATH_TIMEOUT_SECS", None),
            ],
            || {
                let config = ClientConfig::from_env().unwrap();
                assert_eq!(config.base_url.as_str(), "http://localhost:8000/");
            },
        );
    }

    #[test]
    fn from_env_rejects_bad_timeout() {
        temp_env::with_vars(
            [
                ("STOCKPATH_API_URL", None),
                ("STOCKPATH_TIMEOUT_SECS", Some("soon")),
            ],
            || {
                assert!(ClientConfig::from_env().is_err());
            },
        );
    }
}
