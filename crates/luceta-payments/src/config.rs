//! Provider Configuration
//!
//! Loaded once at process start and passed explicitly into the client.

use serde::{Deserialize, Serialize};

use crate::error::{PaymentError, Result};

pub const API_KEY_VAR: &str = "DODO_PAYMENTS_API_KEY";
pub const ENVIRONMENT_VAR: &str = "DODO_PAYMENTS_ENVIRONMENT";
pub const RETURN_URL_VAR: &str = "DODO_PAYMENTS_RETURN_URL";
pub const BASE_URL_VAR: &str = "DODO_PAYMENTS_BASE_URL";

const DEFAULT_RETURN_URL: &str = "http://localhost:3000/success";

/// Provider environment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    TestMode,
    LiveMode,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::TestMode => "test_mode",
            Environment::LiveMode => "live_mode",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.trim() {
            "test_mode" => Ok(Environment::TestMode),
            "live_mode" => Ok(Environment::LiveMode),
            other => Err(PaymentError::Config(format!(
                "{ENVIRONMENT_VAR} must be test_mode or live_mode, got {other:?}"
            ))),
        }
    }

    /// Provider API root for this environment
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::TestMode => "https://test.dodopayments.com",
            Environment::LiveMode => "https://api.dodopayments.com",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dodo Payments configuration
#[derive(Clone, Debug)]
pub struct DodoConfig {
    /// Bearer token sent with every request
    pub bearer_token: String,

    /// Selects the provider base URL
    pub environment: Environment,

    /// Where the provider redirects after checkout
    pub return_url: String,

    /// Overrides the environment's base URL (staging, tests)
    pub base_url_override: Option<String>,
}

impl DodoConfig {
    pub fn new(bearer_token: impl Into<String>, environment: Environment) -> Self {
        Self {
            bearer_token: bearer_token.into(),
            environment,
            return_url: DEFAULT_RETURN_URL.into(),
            base_url_override: None,
        }
    }

    /// Point the client at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    pub fn with_return_url(mut self, return_url: impl Into<String>) -> Self {
        self.return_url = return_url.into();
        self
    }

    /// Build from an arbitrary variable source.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bearer_token = get(API_KEY_VAR)
            .ok_or_else(|| PaymentError::Config(format!("{API_KEY_VAR} not set")))?;
        let environment = match get(ENVIRONMENT_VAR) {
            Some(value) => Environment::parse(&value)?,
            None => Environment::default(),
        };

        Ok(Self {
            bearer_token,
            environment,
            return_url: get(RETURN_URL_VAR).unwrap_or_else(|| DEFAULT_RETURN_URL.into()),
            base_url_override: get(BASE_URL_VAR),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Effective API root, without trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url_override
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
            .trim_end_matches('/')
    }
}
