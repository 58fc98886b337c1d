//! Scripted backend for unit tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{GenerationError, GenerationRequest, GenerativeBackend, PromptKind};

/// Replies with a canned text per kind and records every request.
#[derive(Default)]
pub struct ScriptedBackend {
    failing: HashSet<PromptKind>,
    calls: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, kind: PromptKind) -> Self {
        self.failing.insert(kind);
        self
    }

    pub fn reply_for(kind: PromptKind) -> String {
        match kind {
            PromptKind::Recommendations => {
                "### Trail Runner X\nGrippy.\n\nCost: $95\n\n### Road Glide\nLight.\n\nCost: $89".to_string()
            }
            other => format!("{} output", other.as_str()),
        }
    }

    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<PromptKind> {
        self.calls().into_iter().map(|c| c.kind).collect()
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push(request.clone());
        if self.failing.contains(&request.kind) {
            return Err(GenerationError::Http {
                status: 503,
                body: "upstream unavailable".to_string(),
            });
        }
        Ok(Self::reply_for(request.kind))
    }
}
