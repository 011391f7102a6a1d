mod youtube;

use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
pub use youtube::YouTubeSearch;

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// A video search service returning video ids, best match first.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search(&self, query: &str, limit: u64) -> AppResult<Vec<String>>;
}

pub struct VideoLookup {
    search: Arc<dyn VideoSearch>,
}

impl VideoLookup {
    pub fn new(search: Arc<dyn VideoSearch>) -> Self {
        Self { search }
    }

    /// Watch URL of the single best match for `query`.
    pub async fn find_video(&self, query: &str) -> AppResult<String> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::validation("Please enter something to search for."));
        }

        let ids = self.search.search(query, 1).await?;
        let id = ids
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found(format!("No video found for \"{}\".", query)))?;

        info!("Video for '{}': {}", query, id);
        Ok(watch_url(&id))
    }
}

pub fn watch_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL, video_id)
}
