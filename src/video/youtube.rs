use super::VideoSearch;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use rusty_ytdl::search::{SearchOptions, SearchResult, SearchType, YouTube};

#[derive(Clone, Default)]
pub struct YouTubeSearch {}

#[async_trait]
impl VideoSearch for YouTubeSearch {
    async fn search(&self, query: &str, limit: u64) -> AppResult<Vec<String>> {
        let youtube = YouTube::new().map_err(|e| {
            AppError::backend(format!("Failed to initialize search client: {}", e))
        })?;
        let options = SearchOptions {
            limit,
            search_type: SearchType::Video,
            safe_search: true,
        };
        let results = youtube
            .search(query.to_string(), Some(&options))
            .await
            .map_err(|e| AppError::backend(format!("YouTube search failed: {}", e)))?;

        Ok(results
            .into_iter()
            .filter_map(|entry| match entry {
                SearchResult::Video(video) => Some(video.id),
                _ => None,
            })
            .take(limit as usize)
            .collect())
    }
}
