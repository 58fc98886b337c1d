//! Gemini `generateContent` client.
//!
//! One POST per generation, no retries. The endpoint carries the API key, so
//! it is never logged.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use url::Url;

use crate::config::{ConfigError, GeminiConfig};

use super::error::GenerationError;
use super::payload::{GenerateContentResponse, GenerationRequest};
use super::GenerativeBackend;

/// Errors raised while building the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    /// Endpoint could not be derived from the config.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// HTTP client could not be created.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Async client for the Gemini API.
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: Url,
    model: String,
}

impl GeminiClient {
    /// Build a client from explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the endpoint is invalid or the HTTP client cannot be built.
    pub fn new(config: &GeminiConfig) -> Result<Self, ClientBuildError> {
        let endpoint = config.endpoint()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .deflate(true);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
            model: config.model.clone(),
        })
    }

    /// Model this client targets.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        tracing::debug!(
            kind = request.kind.as_str(),
            model = %self.model,
            grounding = request.grounding,
            "Sending prompt to Gemini"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request.to_wire())
            .send()
            .await
            .map_err(|err| {
                let err = err.without_url();
                tracing::error!(kind = request.kind.as_str(), error = %err, "Gemini transport error");
                GenerationError::Transport(err)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(reqwest::Error::without_url)?;

        if !status.is_success() {
            tracing::error!(
                kind = request.kind.as_str(),
                status = status.as_u16(),
                "Gemini API HTTP error"
            );
            return Err(GenerationError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            GenerationError::MalformedResponse(format!("body is not valid JSON: {e}"))
        })?;
        parsed.into_text()
    }
}
