use super::types::{
    self, FavoriteRecipe, InventoryStore, Product, RecipeStore, require_quantity, require_text,
};
use crate::entity::{favorite_recipes, products};
use crate::error::AppResult;
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

const DB_FILE: &str = "nutrivision.db";

/// SQLite-backed store for both tables. Every operation opens its own
/// connection on a blocking worker and drops it when the operation returns.
pub struct SqliteStore {
    db_url: String,
}

impl SqliteStore {
    pub async fn open(data_dir: &Path) -> AppResult<Arc<Self>> {
        std::fs::create_dir_all(data_dir)?;
        let db_path = data_dir.join(DB_FILE);
        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

        let store = Arc::new(Self { db_url });
        store
            .with_db(|db| {
                db.get_schema_builder()
                    .register(favorite_recipes::Entity)
                    .register(products::Entity)
                    .apply(db)?;
                Ok(())
            })
            .await?;

        info!("SQLite store ready at {}", db_path.display());
        Ok(store)
    }

    async fn with_db<T, F>(&self, f: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&DatabaseConnection) -> AppResult<T> + Send + 'static,
    {
        let db_url = self.db_url.clone();
        tokio::task::spawn_blocking(move || -> AppResult<T> {
            let db = Database::connect(&db_url)?;
            f(&db)
        })
        .await?
    }
}

#[async_trait]
impl RecipeStore for SqliteStore {
    async fn add(&self, name: &str, recipe: &str) -> AppResult<i64> {
        let record = favorite_recipes::ActiveModel {
            id: NotSet,
            name: Set(require_text("Recipe name", name)?),
            recipe: Set(require_text("Recipe", recipe)?),
        };

        let id = self
            .with_db(move |db| {
                let result = favorite_recipes::Entity::insert(record).exec(db)?;
                Ok(result.last_insert_id)
            })
            .await?;

        info!("Added favorite recipe {}", id);
        Ok(id)
    }

    async fn list(&self) -> AppResult<Vec<FavoriteRecipe>> {
        self.with_db(|db| {
            let rows = favorite_recipes::Entity::find()
                .order_by_asc(favorite_recipes::Column::Id)
                .all(db)?;
            Ok(rows.into_iter().map(|r| r.into()).collect())
        })
        .await
    }

    async fn update(&self, id: i64, name: &str, recipe: &str) -> AppResult<()> {
        let name = require_text("Recipe name", name)?;
        let recipe = require_text("Recipe", recipe)?;

        let affected = self
            .with_db(move |db| {
                let result = favorite_recipes::Entity::update_many()
                    .col_expr(favorite_recipes::Column::Name, Expr::value(name))
                    .col_expr(favorite_recipes::Column::Recipe, Expr::value(recipe))
                    .filter(favorite_recipes::Column::Id.eq(id))
                    .exec(db)?;
                Ok(result.rows_affected)
            })
            .await?;

        if affected == 0 {
            return Err(types::recipe_not_found(id));
        }
        info!("Updated favorite recipe {}", id);
        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let affected = self
            .with_db(move |db| {
                let result = favorite_recipes::Entity::delete_by_id(id).exec(db)?;
                Ok(result.rows_affected)
            })
            .await?;

        if affected == 0 {
            return Err(types::recipe_not_found(id));
        }
        info!("Deleted favorite recipe {}", id);
        Ok(())
    }
}

#[async_trait]
impl InventoryStore for SqliteStore {
    async fn add(&self, name: &str, quantity: i64) -> AppResult<i64> {
        let record = products::ActiveModel {
            id: NotSet,
            name: Set(require_text("Product name", name)?),
            quantity: Set(require_quantity(quantity)?),
        };

        let id = self
            .with_db(move |db| {
                let result = products::Entity::insert(record).exec(db)?;
                Ok(result.last_insert_id)
            })
            .await?;

        debug!("Added product {} (x{})", id, quantity);
        Ok(id)
    }

    async fn list(&self) -> AppResult<Vec<Product>> {
        self.with_db(|db| {
            let rows = products::Entity::find()
                .order_by_asc(products::Column::Id)
                .all(db)?;
            Ok(rows.into_iter().map(|r| r.into()).collect())
        })
        .await
    }

    async fn update(&self, id: i64, name: &str, quantity: i64) -> AppResult<()> {
        let name = require_text("Product name", name)?;
        let quantity = require_quantity(quantity)?;

        let affected = self
            .with_db(move |db| {
                let result = products::Entity::update_many()
                    .col_expr(products::Column::Name, Expr::value(name))
                    .col_expr(products::Column::Quantity, Expr::value(quantity))
                    .filter(products::Column::Id.eq(id))
                    .exec(db)?;
                Ok(result.rows_affected)
            })
            .await?;

        if affected == 0 {
            return Err(types::product_not_found(id));
        }
        debug!("Updated product {}", id);
        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let affected = self
            .with_db(move |db| {
                let result = products::Entity::delete_by_id(id).exec(db)?;
                Ok(result.rows_affected)
            })
            .await?;

        if affected == 0 {
            return Err(types::product_not_found(id));
        }
        debug!("Deleted product {}", id);
        Ok(())
    }
}
