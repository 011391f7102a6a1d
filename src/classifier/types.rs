use crate::error::AppResult;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Label {
    pub label: String,
    pub score: f32,
}

/// A pretrained image-classification model. Labels come back best first.
#[async_trait]
pub trait LabelModel: Send + Sync {
    fn name(&self) -> &str;
    async fn labels(&self, image: &[u8]) -> AppResult<Vec<Label>>;
}
