//! Error types for the generation gateway.

use thiserror::Error;

/// Errors that can occur while generating text upstream.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The request could not be sent or the body could not be read.
    #[error("An unexpected error occurred during AI generation: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("Gemini API HTTP Error: {status}. Details: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The response is not JSON or has no text where it should.
    #[error("Gemini API returned an unexpected response shape: {0}")]
    MalformedResponse(String),
}

impl GenerationError {
    /// Upstream HTTP status, when the failure carried one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
