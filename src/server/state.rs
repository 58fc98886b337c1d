//! Application state shared across all request handlers.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::llm::{ClientBuildError, GeminiClient, GenerativeBackend};

/// Shared application state.
pub struct AppState {
    /// Backend every generation goes through.
    pub backend: Arc<dyn GenerativeBackend>,
    /// Model name, reported by the health endpoint.
    pub model_name: String,
    /// Directory served at `/`.
    pub static_dir: PathBuf,
}

impl AppState {
    /// Create state around an arbitrary backend.
    #[must_use]
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        model_name: impl Into<String>,
        static_dir: impl Into<PathBuf>,
    ) -> Arc<Self> {
        Arc::new(Self {
            backend,
            model_name: model_name.into(),
            static_dir: static_dir.into(),
        })
    }

    /// Create state backed by the Gemini client described in `config`.
    ///
    /// # Errors
    /// Returns an error if the Gemini client cannot be created.
    pub fn from_config(config: &AppConfig) -> Result<Arc<Self>, ClientBuildError> {
        let client = GeminiClient::new(&config.gemini)?;
        let model_name = client.model().to_string();
        Ok(Self::new(Arc::new(client), model_name, config.static_dir.clone()))
    }
}
