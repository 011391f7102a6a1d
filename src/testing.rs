//! In-process fakes for the external services.

use crate::classifier::{Label, LabelModel};
use crate::error::{AppError, AppResult};
use crate::llm::{CompletionParams, TextBackend};
use crate::video::VideoSearch;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays scripted replies in order and records every prompt it receives.
pub struct FakeBackend {
    replies: Mutex<VecDeque<AppResult<String>>>,
    calls: Mutex<Vec<(String, CompletionParams)>>,
}

impl FakeBackend {
    pub fn new(replies: Vec<AppResult<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn with_replies<I>(replies: I) -> Arc<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::new(replies.into_iter().map(|r| Ok(r.into())).collect())
    }

    pub fn calls(&self) -> Vec<(String, CompletionParams)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    async fn complete(&self, prompt: &str, params: CompletionParams) -> AppResult<String> {
        self.calls.lock().unwrap().push((prompt.to_string(), params));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::backend("no scripted reply left")))
    }
}

/// Returns a fixed list of video ids; `None` simulates a failing search.
pub struct FakeVideoSearch {
    pub ids: Option<Vec<String>>,
    pub queries: Mutex<Vec<String>>,
}

impl FakeVideoSearch {
    pub fn returning(ids: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            ids: Some(ids.iter().map(|s| s.to_string()).collect()),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            ids: None,
            queries: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl VideoSearch for FakeVideoSearch {
    async fn search(&self, query: &str, limit: u64) -> AppResult<Vec<String>> {
        self.queries.lock().unwrap().push(query.to_string());
        match &self.ids {
            Some(ids) => Ok(ids.iter().take(limit as usize).cloned().collect()),
            None => Err(AppError::backend("search unavailable")),
        }
    }
}

/// A classification model with canned labels; `None` simulates an API error.
pub struct FakeLabelModel {
    pub name: &'static str,
    pub labels: Option<Vec<Label>>,
}

impl FakeLabelModel {
    pub fn with_labels(name: &'static str, labels: &[(&str, f32)]) -> Arc<dyn LabelModel> {
        Arc::new(Self {
            name,
            labels: Some(
                labels
                    .iter()
                    .map(|(label, score)| Label {
                        label: label.to_string(),
                        score: *score,
                    })
                    .collect(),
            ),
        })
    }

    pub fn failing(name: &'static str) -> Arc<dyn LabelModel> {
        Arc::new(Self { name, labels: None })
    }
}

#[async_trait]
impl LabelModel for FakeLabelModel {
    fn name(&self) -> &str {
        self.name
    }

    async fn labels(&self, _image: &[u8]) -> AppResult<Vec<Label>> {
        self.labels
            .clone()
            .ok_or_else(|| AppError::backend(format!("{} is loading", self.name)))
    }
}
