use crate::error::{AppError, AppResult};
use crate::orchestrator::Orchestrator;
use crate::store::{FavoriteRecipe, Product};
use chrono::{DateTime, Local};
use std::fmt;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    You,
    Nutritionist,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::You => f.write_str("You"),
            Self::Nutritionist => f.write_str("Nutritionist"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Local>,
}

impl ChatTurn {
    fn new(speaker: Speaker, text: String) -> Self {
        Self {
            speaker,
            text,
            at: Local::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChatState {
    #[default]
    Idle,
    Active,
}

/// The nutritionist chat. Once started it stays active; starting again
/// clears the transcript.
#[derive(Debug, Default)]
pub struct ChatSession {
    state: ChatState,
    history: Vec<ChatTurn>,
}

impl ChatSession {
    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Opens the chat with initial advice on `favorites`. Needs at least one
    /// favorite; the backend is not called otherwise.
    pub async fn start(
        &mut self,
        orchestrator: &Orchestrator,
        favorites: &[FavoriteRecipe],
        fridge: &[Product],
    ) -> AppResult<&ChatTurn> {
        if favorites.is_empty() {
            return Err(AppError::validation(
                "Add favorite recipes to get nutritional advice.",
            ));
        }

        let advice = orchestrator.advise(favorites, Some(fridge), None).await?;

        self.history.clear();
        self.history.push(ChatTurn::new(Speaker::Nutritionist, advice));
        self.state = ChatState::Active;
        info!("Chat started with {} favorite recipes", favorites.len());
        Ok(&self.history[0])
    }

    /// Asks a follow-up; the transcript only grows when the answer arrives.
    pub async fn ask(
        &mut self,
        orchestrator: &Orchestrator,
        favorites: &[FavoriteRecipe],
        fridge: &[Product],
        question: &str,
    ) -> AppResult<&ChatTurn> {
        if self.state == ChatState::Idle {
            return Err(AppError::validation(
                "Start a chat first, then ask your questions.",
            ));
        }
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::validation("Please type a question."));
        }

        let answer = orchestrator
            .advise(favorites, Some(fridge), Some(question))
            .await?;

        self.history
            .push(ChatTurn::new(Speaker::You, question.to_string()));
        self.history.push(ChatTurn::new(Speaker::Nutritionist, answer));
        Ok(&self.history[self.history.len() - 1])
    }

    pub fn transcript(&self) -> String {
        self.history
            .iter()
            .map(|t| format!("**{}** ({}): {}", t.speaker, t.at.format("%H:%M"), t.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::DishNameStrategy;
    use crate::testing::FakeBackend;
    use std::sync::Arc;

    fn favorites() -> Vec<FavoriteRecipe> {
        vec![FavoriteRecipe {
            id: 1,
            name: "Lentil soup".into(),
            recipe: "Simmer lentils with carrots.".into(),
        }]
    }

    fn orchestrator(backend: &Arc<FakeBackend>) -> Orchestrator {
        Orchestrator::new(backend.clone(), DishNameStrategy::Ask)
    }

    #[tokio::test]
    async fn start_without_favorites_stays_idle_and_skips_backend() {
        let backend = FakeBackend::with_replies(["unused"]);
        let mut chat = ChatSession::default();

        let err = chat
            .start(&orchestrator(&backend), &[], &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(chat.state(), ChatState::Idle);
        assert!(chat.history().is_empty());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn start_then_ask_builds_transcript() {
        let backend = FakeBackend::with_replies(["Good fiber intake.", "Add some protein."]);
        let o = orchestrator(&backend);
        let mut chat = ChatSession::default();

        chat.start(&o, &favorites(), &[]).await.unwrap();
        assert_eq!(chat.state(), ChatState::Active);

        let answer = chat
            .ask(&o, &favorites(), &[], "What am I missing?")
            .await
            .unwrap();
        assert_eq!(answer.text, "Add some protein.");

        let turns: Vec<(Speaker, &str)> = chat
            .history()
            .iter()
            .map(|t| (t.speaker, t.text.as_str()))
            .collect();
        assert_eq!(
            turns,
            [
                (Speaker::Nutritionist, "Good fiber intake."),
                (Speaker::You, "What am I missing?"),
                (Speaker::Nutritionist, "Add some protein."),
            ]
        );
        assert!(chat.transcript().contains("**You**"));
    }

    #[tokio::test]
    async fn ask_while_idle_is_rejected() {
        let backend = FakeBackend::with_replies(["unused"]);
        let mut chat = ChatSession::default();
        let err = chat
            .ask(&orchestrator(&backend), &favorites(), &[], "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_answer_leaves_history_untouched() {
        let backend = FakeBackend::new(vec![
            Ok("Start advice".to_string()),
            Err(AppError::backend("rate limited")),
        ]);
        let o = orchestrator(&backend);
        let mut chat = ChatSession::default();
        chat.start(&o, &favorites(), &[]).await.unwrap();

        assert!(chat.ask(&o, &favorites(), &[], "Q?").await.is_err());
        assert_eq!(chat.history().len(), 1);
        assert_eq!(chat.state(), ChatState::Active);
    }

    #[tokio::test]
    async fn failed_start_keeps_chat_idle() {
        let backend = FakeBackend::new(vec![Err(AppError::backend("down"))]);
        let mut chat = ChatSession::default();
        assert!(chat.start(&orchestrator(&backend), &favorites(), &[]).await.is_err());
        assert_eq!(chat.state(), ChatState::Idle);
    }

    #[tokio::test]
    async fn restarting_resets_history() {
        let backend = FakeBackend::with_replies(["first", "answer", "second"]);
        let o = orchestrator(&backend);
        let mut chat = ChatSession::default();

        chat.start(&o, &favorites(), &[]).await.unwrap();
        chat.ask(&o, &favorites(), &[], "more?").await.unwrap();
        chat.start(&o, &favorites(), &[]).await.unwrap();

        assert_eq!(chat.history().len(), 1);
        assert_eq!(chat.history()[0].text, "second");
        assert_eq!(chat.state(), ChatState::Active);
    }
}
