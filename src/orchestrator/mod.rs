mod dish_name;
mod prompt;

use crate::error::{AppError, AppResult};
use crate::llm::{CompletionParams, TextBackend};
use crate::store::{FavoriteRecipe, Product};
pub use dish_name::{DISH_NAME_FALLBACK, DishNameStrategy};
use std::sync::Arc;
use tracing::{info, warn};

const RECIPE_PARAMS: CompletionParams = CompletionParams::new(512);
const DISH_NAME_PARAMS: CompletionParams = CompletionParams::new(50);
const ANSWER_PARAMS: CompletionParams = CompletionParams::new(500);

/// Turns stored data and user input into prompts, sends them to the text
/// backend and extracts the part of the answer the caller needs.
pub struct Orchestrator {
    backend: Arc<dyn TextBackend>,
    dish_name: DishNameStrategy,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn TextBackend>, dish_name: DishNameStrategy) -> Self {
        Self { backend, dish_name }
    }

    async fn ask(&self, prompt: &str, params: CompletionParams, what: &str) -> AppResult<String> {
        let response = self.backend.complete(prompt, params).await?;
        let response = response.trim();
        if response.is_empty() {
            return Err(AppError::backend(format!(
                "{} returned an empty {}",
                self.backend.name(),
                what
            )));
        }
        Ok(response.to_string())
    }

    pub async fn generate_recipe(&self, ingredients: &str) -> AppResult<String> {
        let ingredients = ingredients.trim();
        if ingredients.is_empty() {
            return Err(AppError::validation("Please enter the ingredients you have."));
        }

        info!("Generating recipe for: {}", ingredients);
        self.ask(&prompt::recipe(ingredients), RECIPE_PARAMS, "recipe")
            .await
    }

    /// Never fails: anything unusable comes back as [`DISH_NAME_FALLBACK`].
    pub async fn extract_dish_name(&self, recipe_text: &str) -> String {
        if recipe_text.trim().is_empty() {
            return DISH_NAME_FALLBACK.to_string();
        }

        let name = match self.dish_name {
            DishNameStrategy::TitleMarker => dish_name::from_title_marker(recipe_text),
            DishNameStrategy::Ask => match self
                .ask(&prompt::dish_name(recipe_text), DISH_NAME_PARAMS, "dish name")
                .await
            {
                Ok(answer) => dish_name::clean(&answer),
                Err(e) => {
                    warn!("Dish name extraction failed: {}", e);
                    None
                }
            },
        };

        name.unwrap_or_else(|| DISH_NAME_FALLBACK.to_string())
    }

    pub async fn advise(
        &self,
        favorites: &[FavoriteRecipe],
        fridge: Option<&[Product]>,
        question: Option<&str>,
    ) -> AppResult<String> {
        let prompt = prompt::advice(favorites, fridge, question);
        self.ask(&prompt, ANSWER_PARAMS, "answer").await
    }

    pub async fn plan_meals(
        &self,
        preferences: &str,
        allergies: &str,
        ingredients: &str,
    ) -> AppResult<String> {
        if [preferences, allergies, ingredients]
            .iter()
            .all(|s| s.trim().is_empty())
        {
            return Err(AppError::validation(
                "Tell me your preferences, allergies or available ingredients first.",
            ));
        }
        let prompt = prompt::meal_plan(preferences, allergies, ingredients);
        self.ask(&prompt, ANSWER_PARAMS, "meal plan").await
    }

    pub async fn recommend(
        &self,
        preferences: &str,
        favorites: &[FavoriteRecipe],
    ) -> AppResult<String> {
        let prompt = prompt::recommendation(preferences, favorites);
        self.ask(&prompt, ANSWER_PARAMS, "recommendation").await
    }
}
