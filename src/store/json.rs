use super::types::{self, FavoriteRecipe, RecipeStore, require_text};
use crate::error::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::{fs, sync::Mutex};
use tracing::{info, warn};

const JSON_FILE: &str = "favorites.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredRecipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    name: String,
    recipe: String,
}

/// Favorite recipes kept as a JSON array in a single file.
///
/// Older files hold bare `{name, recipe}` objects; those get ids on load
/// (1..n when no entry has one) and are rewritten with ids on the next change.
pub struct JsonRecipeStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonRecipeStore {
    pub async fn open(data_dir: &Path) -> AppResult<Arc<Self>> {
        fs::create_dir_all(data_dir).await?;
        let store = Arc::new(Self {
            path: data_dir.join(JSON_FILE),
            write_lock: Mutex::new(()),
        });

        let count = store.load().await?.len();
        info!(
            "JSON recipe store ready at {} ({} recipes)",
            store.path.display(),
            count
        );
        Ok(store)
    }

    async fn load(&self) -> AppResult<Vec<FavoriteRecipe>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let stored: Vec<StoredRecipe> = serde_json::from_str(&content)?;
        let mut next_id = stored.iter().filter_map(|r| r.id).max().unwrap_or(0) + 1;

        let mut recipes = Vec::with_capacity(stored.len());
        for entry in stored {
            let id = entry.id.unwrap_or_else(|| {
                let id = next_id;
                next_id += 1;
                id
            });
            recipes.push(FavoriteRecipe {
                id,
                name: entry.name,
                recipe: entry.recipe,
            });
        }
        Ok(recipes)
    }

    async fn save(&self, recipes: &[FavoriteRecipe]) -> AppResult<()> {
        let stored: Vec<StoredRecipe> = recipes
            .iter()
            .map(|r| StoredRecipe {
                id: Some(r.id),
                name: r.name.clone(),
                recipe: r.recipe.clone(),
            })
            .collect();
        let content = serde_json::to_string_pretty(&stored)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            warn!("Atomic rename of {} failed: {}", tmp.display(), e);
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl RecipeStore for JsonRecipeStore {
    async fn add(&self, name: &str, recipe: &str) -> AppResult<i64> {
        let name = require_text("Recipe name", name)?;
        let recipe = require_text("Recipe", recipe)?;

        let _guard = self.write_lock.lock().await;
        let mut recipes = self.load().await?;
        let id = recipes.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        recipes.push(FavoriteRecipe { id, name, recipe });
        self.save(&recipes).await?;

        info!("Added favorite recipe {} (json)", id);
        Ok(id)
    }

    async fn list(&self) -> AppResult<Vec<FavoriteRecipe>> {
        self.load().await
    }

    async fn update(&self, id: i64, name: &str, recipe: &str) -> AppResult<()> {
        let name = require_text("Recipe name", name)?;
        let recipe = require_text("Recipe", recipe)?;

        let _guard = self.write_lock.lock().await;
        let mut recipes = self.load().await?;
        let entry = recipes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| types::recipe_not_found(id))?;
        entry.name = name;
        entry.recipe = recipe;
        self.save(&recipes).await?;

        info!("Updated favorite recipe {} (json)", id);
        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut recipes = self.load().await?;
        let before = recipes.len();
        recipes.retain(|r| r.id != id);
        if recipes.len() == before {
            return Err(types::recipe_not_found(id));
        }
        self.save(&recipes).await?;

        info!("Deleted favorite recipe {} (json)", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[tokio::test]
    async fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonRecipeStore::open(dir.path()).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn crud_round_trip_keeps_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonRecipeStore::open(dir.path()).await.unwrap();

        let a = store.add("Pancakes", "Mix and fry.").await.unwrap();
        let b = store.add("Porridge", "Simmer oats.").await.unwrap();
        let c = store.add("Toast", "Toast bread.").await.unwrap();
        assert_eq!((a, b, c), (1, 2, 3));

        store.update(b, "Overnight oats", "Soak oats.").await.unwrap();
        store.delete(a).await.unwrap();

        let all = store.list().await.unwrap();
        let names: Vec<&str> = all.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Overnight oats", "Toast"]);
        assert_eq!(all[0].recipe, "Soak oats.");

        // ids keep growing after a delete of the lowest one
        assert_eq!(store.add("Eggs", "Boil.").await.unwrap(), 4);
    }

    #[tokio::test]
    async fn legacy_entries_without_ids_get_positional_ids() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(JSON_FILE),
            r#"[{"name": "Borscht", "recipe": "Beets."}, {"name": "Pelmeni", "recipe": "Dough."}]"#,
        )
        .unwrap();

        let store = JsonRecipeStore::open(dir.path()).await.unwrap();
        let all = store.list().await.unwrap();
        assert_eq!(all[0].id, 1);
        assert_eq!(all[1].id, 2);

        store.delete(1).await.unwrap();
        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Pelmeni");
        assert_eq!(all[0].id, 2);
    }

    #[tokio::test]
    async fn missing_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonRecipeStore::open(dir.path()).await.unwrap();
        store.add("A", "a").await.unwrap();

        assert!(matches!(
            store.update(9, "B", "b").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(store.delete(9).await, Err(AppError::NotFound(_))));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_get_distinct_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonRecipeStore::open(dir.path()).await.unwrap();

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..20 {
            let store = store.clone();
            tasks.spawn(async move { store.add(&format!("Recipe {}", i), "Cook it.").await });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap().unwrap();
        }

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 20);
        let mut ids: Vec<i64> = all.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids, (1..=20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(JSON_FILE), "{not json").unwrap();
        assert!(matches!(
            JsonRecipeStore::open(dir.path()).await,
            Err(AppError::Storage(_))
        ));
    }
}
