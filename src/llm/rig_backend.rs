use super::types::{CompletionParams, TextBackend};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use rig::{client::CompletionClient, completion::Prompt};
use tracing::debug;

const PREAMBLE: &str = "You are a helpful cooking and nutrition assistant.";

pub struct RigBackend<C: CompletionClient> {
    client: C,
    model: String,
    provider: &'static str,
}

impl<C: CompletionClient> RigBackend<C> {
    pub fn new(client: C, model: &str, provider: &'static str) -> Self {
        Self {
            client,
            model: model.to_string(),
            provider,
        }
    }
}

#[async_trait]
impl<C> TextBackend for RigBackend<C>
where
    C: CompletionClient + Send + Sync,
    C::CompletionModel: 'static,
{
    fn name(&self) -> &str {
        self.provider
    }

    async fn complete(&self, prompt: &str, params: CompletionParams) -> AppResult<String> {
        debug!(
            "{} completion: model={}, max_tokens={}, prompt_len={}",
            self.provider,
            self.model,
            params.max_tokens,
            prompt.len()
        );

        let agent = self
            .client
            .agent(self.model.as_str())
            .preamble(PREAMBLE)
            .max_tokens(params.max_tokens)
            .temperature(params.temperature)
            .build();

        let response = agent
            .prompt(prompt)
            .await
            .map_err(|e| AppError::backend(format!("{}: {}", self.provider, e)))?;

        Ok(response.to_string())
    }
}
