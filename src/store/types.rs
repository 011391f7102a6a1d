use crate::entity::{favorite_recipes, products};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecipe {
    pub id: i64,
    pub name: String,
    pub recipe: String,
}

impl From<favorite_recipes::Model> for FavoriteRecipe {
    fn from(r: favorite_recipes::Model) -> Self {
        Self {
            id: r.id,
            name: r.name,
            recipe: r.recipe,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
}

impl Product {
    pub fn format_for_prompt(&self) -> String {
        format!("- {} (quantity: {})", self.name, self.quantity)
    }
}

impl From<products::Model> for Product {
    fn from(r: products::Model) -> Self {
        Self {
            id: r.id,
            name: r.name,
            quantity: r.quantity,
        }
    }
}

/// Favorite recipe persistence. Records come back from `list` in insertion order.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn add(&self, name: &str, recipe: &str) -> AppResult<i64>;
    async fn list(&self) -> AppResult<Vec<FavoriteRecipe>>;
    async fn update(&self, id: i64, name: &str, recipe: &str) -> AppResult<()>;
    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Fridge inventory persistence.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn add(&self, name: &str, quantity: i64) -> AppResult<i64>;
    async fn list(&self) -> AppResult<Vec<Product>>;
    async fn update(&self, id: i64, name: &str, quantity: i64) -> AppResult<()>;
    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Trims `value` and rejects it when nothing is left.
pub fn require_text(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{} must not be empty.", field)));
    }
    Ok(value.to_string())
}

pub fn require_quantity(quantity: i64) -> AppResult<i64> {
    if quantity < 1 {
        return Err(AppError::validation(format!(
            "Quantity must be a positive whole number, got {}.",
            quantity
        )));
    }
    Ok(quantity)
}

pub(crate) fn recipe_not_found(id: i64) -> AppError {
    AppError::not_found(format!("No favorite recipe with ID {}.", id))
}

pub(crate) fn product_not_found(id: i64) -> AppError {
    AppError::not_found(format!("No product with ID {}.", id))
}
