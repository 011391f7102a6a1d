mod json;
mod sqlite;
mod types;

use crate::config::{Config, RecipeBackend};
use crate::error::AppResult;
pub use json::JsonRecipeStore;
pub use sqlite::SqliteStore;
use std::sync::Arc;
pub use types::{FavoriteRecipe, InventoryStore, Product, RecipeStore};

pub struct Stores {
    pub recipes: Arc<dyn RecipeStore>,
    pub inventory: Arc<dyn InventoryStore>,
}

pub async fn create_stores(config: &Config) -> AppResult<Stores> {
    let sqlite = SqliteStore::open(&config.data_dir).await?;

    let recipes: Arc<dyn RecipeStore> = match config.recipe_backend {
        RecipeBackend::Json => JsonRecipeStore::open(&config.data_dir).await?,
        RecipeBackend::Sqlite => sqlite.clone(),
    };

    Ok(Stores {
        recipes,
        inventory: sqlite,
    })
}
