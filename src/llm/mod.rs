mod rig_backend;
mod types;

use crate::config::{LlmConfig, Provider};
use anyhow::Result;
use rig::providers::{anthropic, cohere, gemini, openai};
use rig_backend::RigBackend;
use std::sync::Arc;
use tracing::{info, warn};
pub use types::{CompletionParams, TextBackend};

/// Builds the configured text backend, or `None` when its API key is missing.
pub fn create_backend(config: &LlmConfig) -> Result<Option<Arc<dyn TextBackend>>> {
    let Some(key) = config.key.as_deref() else {
        warn!(
            "No API key for {:?} (set {}); text generation disabled",
            config.provider,
            config.provider.key_var()
        );
        return Ok(None);
    };

    let backend: Arc<dyn TextBackend> = match config.provider {
        Provider::OpenAi => {
            let client: openai::CompletionsClient = openai::CompletionsClient::builder()
                .api_key(key)
                .base_url(&config.url)
                .build()?;
            Arc::new(RigBackend::new(client, &config.model, "openai"))
        }
        Provider::Anthropic => {
            let client: anthropic::Client = anthropic::Client::builder()
                .api_key(key)
                .base_url(&config.url)
                .build()?;
            Arc::new(RigBackend::new(client, &config.model, "anthropic"))
        }
        Provider::Gemini => {
            let client: gemini::Client = gemini::Client::builder()
                .api_key(key)
                .base_url(&config.url)
                .build()?;
            Arc::new(RigBackend::new(client, &config.model, "gemini"))
        }
        Provider::Cohere => {
            let client: cohere::Client = cohere::Client::builder()
                .api_key(key)
                .base_url(&config.url)
                .build()?;
            Arc::new(RigBackend::new(client, &config.model, "cohere"))
        }
    };

    info!(
        "Text backend ready ({}, model: {})",
        backend.name(),
        config.model
    );
    Ok(Some(backend))
}
