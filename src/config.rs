//! Configuration for the shopping assistant.
//!
//! Everything is read once at startup into explicit values; nothing else in
//! the crate touches the process environment.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default listen port.
pub const DEFAULT_PORT: u16 = 5000;
/// Default directory holding `index.html`.
pub const DEFAULT_STATIC_DIR: &str = "static";

const API_KEY_ENV: &str = "GEMINI_API_KEY";
const MODEL_ENV: &str = "GEMINI_MODEL";
const BASE_URL_ENV: &str = "GEMINI_API_BASE_URL";
const TIMEOUT_ENV: &str = "GEMINI_TIMEOUT_SECS";
const PORT_ENV: &str = "SHOPPING_ASSISTANT_PORT";
const STATIC_DIR_ENV: &str = "SHOPPING_ASSISTANT_STATIC_DIR";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is absent or empty.
    #[error("{0} environment variable not set or loaded")]
    Missing(&'static str),
    /// A variable could not be parsed.
    #[error("invalid value for {name}: {value:?}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
    /// The base URL or derived endpoint is not a valid URL.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

/// Settings for the Gemini gateway client.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key, sent as the `key` query parameter.
    pub api_key: String,
    /// Model name used in the endpoint path.
    pub model: String,
    /// Scheme and host of the API.
    pub base_url: String,
    /// Whole-request timeout; `None` keeps the transport default.
    pub request_timeout: Option<Duration>,
}

impl GeminiConfig {
    /// Create a config for `api_key` with default model and base URL.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
        }
    }

    /// Set the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set a whole-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Build the `generateContent` endpoint, key included.
    ///
    /// # Errors
    /// Returns an error if the base URL does not parse.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let mut base = Url::parse(&self.base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let mut url = base.join(&format!(
            "v1beta/models/{}:generateContent",
            self.model
        ))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Top-level application configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Gateway settings.
    pub gemini: GeminiConfig,
    /// Listen port.
    pub port: u16,
    /// Directory served at `/`.
    pub static_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// Returns an error if the API key is missing or a value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns an error if the API key is missing or a value is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = non_empty(API_KEY_ENV).ok_or(ConfigError::Missing(API_KEY_ENV))?;
        let mut gemini = GeminiConfig::new(api_key);

        if let Some(model) = non_empty(MODEL_ENV) {
            gemini = gemini.with_model(model);
        }
        if let Some(base_url) = non_empty(BASE_URL_ENV) {
            gemini = gemini.with_base_url(base_url);
        }
        if let Some(raw) = non_empty(TIMEOUT_ENV) {
            let secs = parse_number::<u64>(TIMEOUT_ENV, &raw)?;
            gemini = gemini.with_timeout(Duration::from_secs(secs));
        }

        let port = match non_empty(PORT_ENV) {
            Some(raw) => parse_number::<u16>(PORT_ENV, &raw)?,
            None => DEFAULT_PORT,
        };

        let static_dir = non_empty(STATIC_DIR_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR), PathBuf::from);

        let config = Self {
            gemini,
            port,
            static_dir,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if the endpoint cannot be built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gemini.model.contains('/') {
            return Err(ConfigError::Invalid {
                name: MODEL_ENV,
                value: self.gemini.model.clone(),
            });
        }
        self.gemini.endpoint()?;
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: raw.to_string(),
    })
}
