use super::types::{Label, LabelModel};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

/// Hosted inference endpoint: POST the raw image bytes to `{base_url}/{model}`.
pub struct HfModel {
    client: reqwest::Client,
    base_url: String,
    token: String,
    model: String,
}

#[derive(Deserialize)]
struct HfErrorResponse {
    error: String,
}

impl HfModel {
    pub fn new(client: reqwest::Client, base_url: &str, token: &str, model: &str) -> Self {
        info!("Image classification model configured: {}", model);
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl LabelModel for HfModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn labels(&self, image: &[u8]) -> AppResult<Vec<Label>> {
        let url = format!("{}/{}", self.base_url, self.model);
        debug!("Classifying {} bytes with {}", image.len(), self.model);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .body(image.to_vec())
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<HfErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(AppError::backend(format!(
                "{} returned {}: {}",
                self.model, status, detail
            )));
        }

        let mut labels: Vec<Label> = resp
            .json()
            .await
            .map_err(|e| AppError::backend(format!("{}: unexpected response: {}", self.model, e)))?;
        sort_by_score(&mut labels);
        Ok(labels)
    }
}

pub(super) fn sort_by_score(labels: &mut [Label]) {
    labels.sort_by(|a, b| b.score.total_cmp(&a.score));
}
