use crate::error::{AssistantError, Result};
use log::debug;
use std::env;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_CURRENCY: &str = "Indian Rupees (INR)";

pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
pub const ENV_GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
pub const ENV_FORECAST_API_URL: &str = "FORECAST_API_URL";
pub const ENV_DOCUMENT_API_URL: &str = "DOCUMENT_API_URL";
pub const ENV_CURRENCY: &str = "ASSISTANT_CURRENCY";

/// Credentials and endpoints for the remote collaborators.
///
/// Resolved once at process start and passed to the clients; nothing in the
/// crate embeds a key or endpoint of its own.
#[derive(Clone, PartialEq)]
pub struct AssistantConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub forecast_url: Option<String>,
    /// Base URL of the document service (`/upload`, `/users/{id}/documents`, ...).
    pub document_api_url: Option<String>,
    /// Currency label quoted in prompts.
    pub currency: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            forecast_url: None,
            document_api_url: None,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl std::fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("forecast_url", &self.forecast_url)
            .field("document_api_url", &self.document_api_url)
            .field("currency", &self.currency)
            .finish()
    }
}

impl AssistantConfig {
    /// Reads the configuration from environment variables, falling back to
    /// defaults for everything except secrets and the forecast endpoint.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Self::default();
        let config = Self {
            gemini_api_key: get(ENV_GEMINI_API_KEY),
            gemini_model: get(ENV_GEMINI_MODEL).unwrap_or(defaults.gemini_model),
            gemini_base_url: get(ENV_GEMINI_BASE_URL)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.gemini_base_url),
            forecast_url: get(ENV_FORECAST_API_URL),
            document_api_url: get(ENV_DOCUMENT_API_URL)
                .map(|url| url.trim_end_matches('/').to_string()),
            currency: get(ENV_CURRENCY).unwrap_or(defaults.currency),
        };
        debug!("Resolved configuration: {:?}", config);
        config
    }

    pub fn with_gemini_api_key(mut self, key: impl Into<String>) -> Self {
        self.gemini_api_key = Some(key.into());
        self
    }

    pub fn with_forecast_url(mut self, url: impl Into<String>) -> Self {
        self.forecast_url = Some(url.into());
        self
    }

    pub fn with_document_api_url(mut self, url: impl Into<String>) -> Self {
        self.document_api_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn require_gemini_key(&self) -> Result<&str> {
        self.gemini_api_key
            .as_deref()
            .ok_or_else(|| AssistantError::MissingConfig(ENV_GEMINI_API_KEY.to_string()))
    }

    pub fn require_forecast_url(&self) -> Result<&str> {
        self.forecast_url
            .as_deref()
            .ok_or_else(|| AssistantError::MissingConfig(ENV_FORECAST_API_URL.to_string()))
    }

    pub fn require_document_api_url(&self) -> Result<&str> {
        self.document_api_url
            .as_deref()
            .ok_or_else(|| AssistantError::MissingConfig(ENV_DOCUMENT_API_URL.to_string()))
    }
}
