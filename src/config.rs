use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::client::Mallam;
use crate::error::MallamError;
use crate::http::DynHttpTransport;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://llm-router.nous.mesolitica.com";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "MALLAM_API_KEY";
/// Environment variable overriding [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "MALLAM_BASE_URL";

/// Endpoint paths, relative to the base URL.
///
/// Upstream has moved these before, so they are configuration rather than constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub chat: String,
    pub embedding: String,
    pub translation: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            chat: "/chat/completions".to_string(),
            embedding: "/embeddings".to_string(),
            translation: "/translation".to_string(),
        }
    }
}

/// Client settings, deserializable from any serde format.
///
/// # Examples
///
/// ```
/// use mallam::config::MallamConfig;
///
/// let config: MallamConfig = serde_json::from_str(
///     r#"{"api_key": "secret", "endpoints": {"translation": "/v2/translation"}}"#,
/// ).unwrap();
/// assert_eq!(config.endpoints.chat, "/chat/completions");
/// assert_eq!(config.endpoints.translation, "/v2/translation");
/// assert!(!format!("{config:?}").contains("secret"));
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct MallamConfig {
    pub api_key: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl fmt::Debug for MallamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MallamConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl MallamConfig {
    /// Config for the default deployment with the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            endpoints: Endpoints::default(),
        }
    }

    /// Reads `MALLAM_API_KEY` (required) and `MALLAM_BASE_URL` (optional).
    ///
    /// # Errors
    ///
    /// Returns [`MallamError::InvalidConfig`] when the API key is missing or blank.
    pub fn from_env() -> Result<Self, MallamError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, MallamError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let api_key = non_blank(API_KEY_ENV).ok_or_else(|| MallamError::InvalidConfig {
            field: API_KEY_ENV.to_string(),
            reason: "environment variable is not set".to_string(),
        })?;
        Ok(Self {
            api_key,
            base_url: non_blank(BASE_URL_ENV),
            endpoints: Endpoints::default(),
        })
    }
}

/// Builds a client from configuration, validating it first.
///
/// # Errors
///
/// Returns [`MallamError::InvalidConfig`] for a blank API key or base URL.
pub fn build_client_from_config(
    config: &MallamConfig,
    transport: DynHttpTransport,
) -> Result<Mallam, MallamError> {
    if config.api_key.trim().is_empty() {
        return Err(MallamError::InvalidConfig {
            field: "api_key".to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    let mut client = Mallam::new(transport, config.api_key.clone())
        .with_endpoints(config.endpoints.clone());
    if let Some(base_url) = &config.base_url {
        if base_url.trim().is_empty() {
            return Err(MallamError::InvalidConfig {
                field: "base_url".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        client = client.with_base_url(base_url.clone());
    }
    Ok(client)
}
