//! Generation gateway: the backend trait, the Gemini client and payload types.

pub mod error;
pub mod gemini;
pub mod payload;

#[cfg(test)]
pub(crate) mod fake;

pub use error::GenerationError;
pub use gemini::{ClientBuildError, GeminiClient};
pub use payload::{GenerationRequest, PromptKind};

use async_trait::async_trait;

/// Anything that can turn a [`GenerationRequest`] into markdown text.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Perform one generation.
    ///
    /// # Errors
    /// Returns an error if the upstream call fails or its reply has no text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}
