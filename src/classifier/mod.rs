mod hf;
mod types;

use crate::config::ClassifierConfig;
use crate::error::AppResult;
use hf::HfModel;
use std::sync::Arc;
use tracing::{info, warn};
pub use types::{Label, LabelModel};

pub const UNKNOWN_FOOD: &str = "Unknown";
pub const NO_INGREDIENTS: &str = "Ingredients not found";

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub food_name: String,
    pub ingredients: Vec<String>,
}

/// Food name from the first model, ingredient guesses from the second.
/// With a single model its labels serve both purposes.
pub struct FoodClassifier {
    food: Arc<dyn LabelModel>,
    ingredients: Option<Arc<dyn LabelModel>>,
}

impl FoodClassifier {
    pub fn new(food: Arc<dyn LabelModel>, ingredients: Option<Arc<dyn LabelModel>>) -> Self {
        Self { food, ingredients }
    }

    /// The top label is taken as-is, whatever its score.
    pub async fn classify(&self, image: &[u8]) -> AppResult<Classification> {
        let food_labels = self.food.labels(image).await?;
        let ingredient_labels = match &self.ingredients {
            Some(model) => model.labels(image).await?,
            None => food_labels.clone(),
        };

        let food_name = food_labels
            .first()
            .map(|l| l.label.clone())
            .unwrap_or_else(|| UNKNOWN_FOOD.to_string());

        let mut ingredients: Vec<String> =
            ingredient_labels.into_iter().map(|l| l.label).collect();
        if ingredients.is_empty() {
            ingredients.push(NO_INGREDIENTS.to_string());
        }

        info!(
            "{} classified image as '{}' ({} ingredient guesses)",
            self.food.name(),
            food_name,
            ingredients.len()
        );
        Ok(Classification {
            food_name,
            ingredients,
        })
    }
}

pub fn create_classifier(config: &ClassifierConfig) -> Option<Arc<FoodClassifier>> {
    let Some(token) = config.key.as_deref() else {
        warn!("No classifier token (set HF_TOKEN); image classification disabled");
        return None;
    };

    let client = reqwest::Client::new();
    let food = Arc::new(HfModel::new(
        client.clone(),
        &config.url,
        token,
        &config.food_model,
    ));
    let ingredients = config.ingredient_model.as_deref().map(|model| {
        Arc::new(HfModel::new(client.clone(), &config.url, token, model)) as Arc<dyn LabelModel>
    });

    Some(Arc::new(FoodClassifier::new(food, ingredients)))
}
