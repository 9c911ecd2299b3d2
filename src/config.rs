//! Client configuration
//!
//! The core constructor never touches the environment; these helpers exist for
//! binaries and services that keep their key in `CMC_*` variables (or a `.env`
//! file loaded with `dotenv`).

use std::time::Duration;

use crate::endpoint::API_BASE_URL;
use crate::error::{CmcError, CmcResult};
use crate::tier::Tier;

pub const ENV_API_KEY: &str = "CMC_API_KEY";
pub const ENV_KEY_TYPE: &str = "CMC_KEY_TYPE";
pub const ENV_FAIL_SILENTLY: &str = "CMC_FAIL_SILENTLY";
pub const ENV_BASE_URL: &str = "CMC_BASE_URL";

/// Client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Log and return `None` on non-200 responses instead of failing
    pub fail_silently: bool,
    pub timeout: Duration,
    /// Must end with `/`; endpoint paths are appended verbatim
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            fail_silently: false,
            timeout: Duration::from_secs(30),
            base_url: API_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_fail_silently(mut self, fail_silently: bool) -> Self {
        self.fail_silently = fail_silently;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Point the client somewhere other than the production API (sandbox, proxy)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    /// Read `CMC_FAIL_SILENTLY` and `CMC_BASE_URL`, defaulting the rest
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(flag) = lookup(ENV_FAIL_SILENTLY) {
            config.fail_silently = parse_flag(&flag);
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(url.trim());
        }
        config
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// API key and the subscription tier it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub key_type: Tier,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, key_type: Tier) -> Self {
        Self {
            api_key: api_key.into(),
            key_type,
        }
    }

    /// Resolve credentials, falling back to environment variables
    ///
    /// Explicit values win. A missing key is read from `CMC_API_KEY` (required),
    /// a missing tier from `CMC_KEY_TYPE` (defaults to `basic`).
    pub fn resolve(api_key: Option<String>, key_type: Option<Tier>) -> CmcResult<Self> {
        Self::from_lookup(api_key, key_type, |name| std::env::var(name).ok())
    }

    fn from_lookup(
        api_key: Option<String>,
        key_type: Option<Tier>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> CmcResult<Self> {
        let api_key = api_key
            .or_else(|| lookup(ENV_API_KEY))
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| CmcError::Config(format!("{} is not set", ENV_API_KEY)))?;

        let key_type = match (key_type, lookup(ENV_KEY_TYPE)) {
            (Some(tier), _) => tier,
            (None, Some(tier)) if !tier.trim().is_empty() => tier.parse()?,
            _ => Tier::default(),
        };

        Ok(Self::new(api_key.trim(), key_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(!config.fail_silently);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.base_url, "https://pro-api.coinmarketcap.com/");
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::default()
            .with_fail_silently(true)
            .with_timeout(Duration::from_secs(5))
            .with_base_url("https://sandbox-api.coinmarketcap.com");

        assert!(config.fail_silently);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.base_url, "https://sandbox-api.coinmarketcap.com/");
    }

    #[test]
    fn test_config_from_lookup() {
        let config = ClientConfig::from_lookup(env(&[
            (ENV_FAIL_SILENTLY, "TRUE"),
            (ENV_BASE_URL, "http://localhost:8080"),
        ]));
        assert!(config.fail_silently);
        assert_eq!(config.base_url, "http://localhost:8080/");

        let config = ClientConfig::from_lookup(env(&[(ENV_FAIL_SILENTLY, "no")]));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_credentials_from_lookup() {
        let creds = Credentials::from_lookup(
            None,
            None,
            env(&[(ENV_API_KEY, " 123test "), (ENV_KEY_TYPE, "Startup")]),
        )
        .unwrap();
        assert_eq!(creds, Credentials::new("123test", Tier::Startup));

        let creds = Credentials::from_lookup(None, None, env(&[(ENV_API_KEY, "k")])).unwrap();
        assert_eq!(creds.key_type, Tier::Basic);
    }

    #[test]
    fn test_explicit_values_override_env() {
        let vars = [(ENV_API_KEY, "from-env"), (ENV_KEY_TYPE, "startup")];

        let creds = Credentials::from_lookup(
            Some("from-flag".to_string()),
            Some(Tier::Enterprise),
            env(&vars),
        )
        .unwrap();
        assert_eq!(creds, Credentials::new("from-flag", Tier::Enterprise));

        let creds = Credentials::from_lookup(Some("from-flag".to_string()), None, env(&vars))
            .unwrap();
        assert_eq!(creds, Credentials::new("from-flag", Tier::Startup));

        let creds = Credentials::from_lookup(None, Some(Tier::Standard), env(&vars)).unwrap();
        assert_eq!(creds, Credentials::new("from-env", Tier::Standard));
    }

    #[test]
    fn test_explicit_tier_skips_bad_env_tier() {
        let creds = Credentials::from_lookup(
            None,
            Some(Tier::Hobbyist),
            env(&[(ENV_API_KEY, "k"), (ENV_KEY_TYPE, "gold")]),
        )
        .unwrap();
        assert_eq!(creds.key_type, Tier::Hobbyist);
    }

    #[test]
    fn test_credentials_missing_key() {
        assert!(matches!(
            Credentials::from_lookup(None, None, env(&[])),
            Err(CmcError::Config(_))
        ));
        assert!(Credentials::from_lookup(None, None, env(&[(ENV_API_KEY, "  ")])).is_err());
        assert!(Credentials::from_lookup(Some(String::new()), None, env(&[])).is_err());
    }

    #[test]
    fn test_credentials_bad_tier() {
        let err = Credentials::from_lookup(
            None,
            None,
            env(&[(ENV_API_KEY, "k"), (ENV_KEY_TYPE, "gold")]),
        )
        .unwrap_err();
        assert!(matches!(err, CmcError::UnknownTier(_)));
    }
}
