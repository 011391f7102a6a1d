use crate::error::AppResult;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub max_tokens: u64,
    pub temperature: f64,
}

impl CompletionParams {
    pub const fn new(max_tokens: u64) -> Self {
        Self {
            max_tokens,
            temperature: 0.7,
        }
    }
}

/// A hosted text-generation service. Implementations return the raw model
/// output; trimming and extraction happen in the orchestrator.
#[async_trait]
pub trait TextBackend: Send + Sync {
    fn name(&self) -> &str;
    async fn complete(&self, prompt: &str, params: CompletionParams) -> AppResult<String>;
}
