mod action;
mod reply;

use crate::classifier::FoodClassifier;
use crate::error::{AppError, AppResult};
use crate::orchestrator::{DISH_NAME_FALLBACK, Orchestrator};
use crate::session::ChatSession;
use crate::store::{FavoriteRecipe, InventoryStore, Product, RecipeStore};
use crate::video::VideoLookup;
pub use action::Action;
pub use reply::{Notice, Reply};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const HELP: &str = "\
**Favorites**: `fav list` · `fav add <name> | <recipe>` · `fav update <id> <name> | <recipe>` · `fav delete <id>`
**Fridge**: `fridge list` · `fridge add <name> <qty>` · `fridge update <id> <name> <qty>` · `fridge delete <id>`
**Recipes**: `generate <ingredients>` then `save` · `recommend <preferences>`
**Nutritionist**: `chat start` · `chat <question>` · `chat history`
**Meal plan**: `plan <preferences> | <allergies> | <ingredients>` · `plan` shows the last one
**Images**: `classify` with an image attached
**Videos**: `video <query>`";

/// Everything a handler may call. Optional services are missing when their
/// API key is not configured.
pub struct Services {
    pub recipes: Arc<dyn RecipeStore>,
    pub inventory: Arc<dyn InventoryStore>,
    pub orchestrator: Option<Arc<Orchestrator>>,
    pub classifier: Option<Arc<FoodClassifier>>,
    pub videos: Arc<VideoLookup>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRecipe {
    pub dish_name: String,
    pub recipe: String,
}

/// Per-session transient state; never persisted.
#[derive(Debug, Default)]
pub struct SessionState {
    pub generated: Option<GeneratedRecipe>,
    pub chat: ChatSession,
    pub meal_plan: Option<String>,
}

pub struct App {
    services: Services,
}

impl App {
    pub fn new(services: Services) -> Arc<Self> {
        Arc::new(Self { services })
    }

    /// Runs one interaction against `state`. Failures never escape: they are
    /// logged and rendered as notices.
    pub async fn handle(&self, state: &mut SessionState, action: Action) -> Reply {
        self.dispatch(state, action).await.unwrap_or_else(|e| {
            if e.is_user_error() {
                info!("Rejected request: {}", e);
            } else {
                error!("Request failed: {}", e);
            }
            Reply::from_error(&e)
        })
    }

    async fn dispatch(&self, state: &mut SessionState, action: Action) -> AppResult<Reply> {
        match action {
            Action::Help => Ok(Reply::default().section("Commands", HELP)),
            Action::ListFavorites => self.list_favorites().await,
            Action::AddFavorite { name, recipe } => self.add_favorite(&name, &recipe).await,
            Action::UpdateFavorite { id, name, recipe } => {
                self.services.recipes.update(id, &name, &recipe).await?;
                self.list_favorites()
                    .await
                    .map(|r| r.notice(Notice::Success("Recipe updated!".into())))
            }
            Action::DeleteFavorite { id } => {
                self.services.recipes.delete(id).await?;
                self.list_favorites()
                    .await
                    .map(|r| r.notice(Notice::Success(format!("Recipe {} deleted!", id))))
            }
            Action::ListProducts => self.list_products().await,
            Action::AddProduct { name, quantity } => {
                self.services.inventory.add(&name, quantity).await?;
                self.list_products().await.map(|r| {
                    r.notice(Notice::Success(format!(
                        "Added {} ({}) to the fridge.",
                        name.trim(),
                        quantity
                    )))
                })
            }
            Action::UpdateProduct { id, name, quantity } => {
                self.services.inventory.update(id, &name, quantity).await?;
                self.list_products()
                    .await
                    .map(|r| r.notice(Notice::Success(format!("Updated product {}.", id))))
            }
            Action::DeleteProduct { id } => {
                self.services.inventory.delete(id).await?;
                self.list_products()
                    .await
                    .map(|r| r.notice(Notice::Success(format!("Deleted product {}.", id))))
            }
            Action::Generate { ingredients } => self.generate(state, &ingredients).await,
            Action::SaveGenerated => self.save_generated(state).await,
            Action::StartChat => self.start_chat(state).await,
            Action::Ask { question } => self.ask(state, &question).await,
            Action::ShowChat => Ok(Self::render_chat(state)),
            Action::PlanMeals {
                preferences,
                allergies,
                ingredients,
            } => {
                self.plan_meals(state, &preferences, &allergies, &ingredients)
                    .await
            }
            Action::ShowPlan => Ok(Self::render_plan(state)),
            Action::Recommend { preferences } => self.recommend(&preferences).await,
            Action::Classify { image } => self.classify(&image).await,
            Action::FindVideo { query } => self
                .services
                .videos
                .find_video(&query)
                .await
                .map(|url| Reply::default().section("Recipe Video", url)),
        }
    }

    fn orchestrator(&self) -> AppResult<Arc<Orchestrator>> {
        self.services
            .orchestrator
            .clone()
            .ok_or(AppError::Unavailable("Text generation"))
    }

    async fn list_favorites(&self) -> AppResult<Reply> {
        let favorites = self.services.recipes.list().await?;
        Ok(Reply::default().section("Saved Recipes", format_favorites(&favorites)))
    }

    async fn add_favorite(&self, name: &str, recipe: &str) -> AppResult<Reply> {
        if name.trim().is_empty() || recipe.trim().is_empty() {
            return Err(AppError::validation(
                "Please provide both a name and a recipe.",
            ));
        }
        self.services.recipes.add(name, recipe).await?;
        self.list_favorites()
            .await
            .map(|r| r.notice(Notice::Success("Recipe added to favorites!".into())))
    }

    async fn list_products(&self) -> AppResult<Reply> {
        let products = self.services.inventory.list().await?;
        Ok(Reply::default().section("Products in the Fridge", format_products(&products)))
    }

    async fn generate(&self, state: &mut SessionState, ingredients: &str) -> AppResult<Reply> {
        let orchestrator = self.orchestrator()?;
        let recipe = orchestrator.generate_recipe(ingredients).await?;
        let dish_name = orchestrator.extract_dish_name(&recipe).await;

        let mut reply = Reply::default()
            .section("Generated Recipe", recipe.as_str())
            .section("Dish Name", dish_name.as_str());

        if dish_name != DISH_NAME_FALLBACK {
            let query = format!("{} cooking", dish_name);
            match self.services.videos.find_video(&query).await {
                Ok(url) => reply = reply.section("Recipe Video", url),
                Err(e) => {
                    warn!("Video lookup for '{}' failed: {}", query, e);
                    reply = reply.notice(Notice::Warning(format!("No recipe video: {}", e)));
                }
            }
        }

        state.generated = Some(GeneratedRecipe { dish_name, recipe });
        Ok(reply.notice(Notice::Success(
            "Recipe ready. Send `save` to add it to your favorites.".into(),
        )))
    }

    async fn save_generated(&self, state: &mut SessionState) -> AppResult<Reply> {
        let Some(generated) = state.generated.take() else {
            return Err(AppError::validation(
                "Generate a recipe first, then save it.",
            ));
        };

        if let Err(e) = self
            .services
            .recipes
            .add(&generated.dish_name, &generated.recipe)
            .await
        {
            state.generated = Some(generated);
            return Err(e);
        }
        Ok(Reply::success(format!(
            "{} added to favorites!",
            generated.dish_name
        )))
    }

    async fn start_chat(&self, state: &mut SessionState) -> AppResult<Reply> {
        let orchestrator = self.orchestrator()?;
        let favorites = self.services.recipes.list().await?;
        let fridge = self.services.inventory.list().await?;

        state.chat.start(&orchestrator, &favorites, &fridge).await?;
        Ok(Self::render_chat(state)
            .notice(Notice::Success("Chat started! You can now ask questions.".into())))
    }

    async fn ask(&self, state: &mut SessionState, question: &str) -> AppResult<Reply> {
        let orchestrator = self.orchestrator()?;
        let favorites = self.services.recipes.list().await?;
        let fridge = self.services.inventory.list().await?;

        state
            .chat
            .ask(&orchestrator, &favorites, &fridge, question)
            .await?;
        Ok(Self::render_chat(state))
    }

    fn render_chat(state: &SessionState) -> Reply {
        if state.chat.history().is_empty() {
            return Reply::warning("No chat yet. Send `chat start` to begin.");
        }
        Reply::default().section("Chat History", state.chat.transcript())
    }

    async fn plan_meals(
        &self,
        state: &mut SessionState,
        preferences: &str,
        allergies: &str,
        ingredients: &str,
    ) -> AppResult<Reply> {
        let orchestrator = self.orchestrator()?;
        let plan = orchestrator
            .plan_meals(preferences, allergies, ingredients)
            .await?;
        state.meal_plan = Some(plan.clone());
        Ok(Reply::default().section("Weekly Meal Plan", plan))
    }

    fn render_plan(state: &SessionState) -> Reply {
        match &state.meal_plan {
            Some(plan) => Reply::default().section("Weekly Meal Plan", plan.as_str()),
            None => Reply::warning(
                "No meal plan yet. Send `plan <preferences> | <allergies> | <ingredients>`.",
            ),
        }
    }

    async fn recommend(&self, preferences: &str) -> AppResult<Reply> {
        let orchestrator = self.orchestrator()?;
        let favorites = self.services.recipes.list().await?;
        let text = orchestrator.recommend(preferences, &favorites).await?;
        Ok(Reply::default().section("Recommended Recipes", text))
    }

    async fn classify(&self, image: &[u8]) -> AppResult<Reply> {
        let classifier = self
            .services
            .classifier
            .clone()
            .ok_or(AppError::Unavailable("Image classification"))?;
        if image.is_empty() {
            return Err(AppError::validation(
                "Attach an image of the food to classify.",
            ));
        }

        let result = classifier.classify(image).await?;
        Ok(Reply::default()
            .section("Classified Food", result.food_name)
            .section("Ingredients", result.ingredients.join(", ")))
    }
}

fn format_favorites(favorites: &[FavoriteRecipe]) -> String {
    if favorites.is_empty() {
        return "No favorite recipes found.".to_string();
    }
    favorites
        .iter()
        .enumerate()
        .map(|(i, f)| format!("{}. **{}** (ID: {})\n{}", i + 1, f.name, f.id, f.recipe))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_products(products: &[Product]) -> String {
    if products.is_empty() {
        return "The fridge is empty.".to_string();
    }
    products
        .iter()
        .map(|p| format!("{}. {} - {}", p.id, p.name, p.quantity))
        .collect::<Vec<_>>()
        .join("\n")
}
