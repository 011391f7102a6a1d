use crate::store::{FavoriteRecipe, Product};
use std::fmt::Write;

const NUTRITIONIST_INTRO: &str = "You are a personal nutritionist. Analyze the following favorite recipes \
                                  and provide detailed, personalized nutritional advice.\n\n";

pub fn recipe(ingredients: &str) -> String {
    format!(
        "Generate a recipe with the following ingredients: {}\n\
         Start with a line of the form 'Title: <dish name>', then list the ingredients and the steps.",
        ingredients
    )
}

pub fn dish_name(recipe_text: &str) -> String {
    format!(
        "Extract the name of the dish from the following recipe text. \
         Output only the name of the dish, nothing else!\n\n{}",
        recipe_text
    )
}

pub fn advice(
    favorites: &[FavoriteRecipe],
    fridge: Option<&[Product]>,
    question: Option<&str>,
) -> String {
    let mut prompt = String::with_capacity(
        NUTRITIONIST_INTRO.len()
            + favorites
                .iter()
                .map(|f| f.name.len() + f.recipe.len() + 16)
                .sum::<usize>()
            + 128,
    );
    prompt.push_str(NUTRITIONIST_INTRO);

    prompt.push_str("Favorite Recipes:\n");
    if favorites.is_empty() {
        prompt.push_str("(none saved yet)\n");
    }
    for favorite in favorites {
        let _ = writeln!(prompt, "Recipe: {}\n{}", favorite.name, favorite.recipe);
    }

    if let Some(products) = fridge.filter(|p| !p.is_empty()) {
        prompt.push_str("\nCurrently in the fridge:\n");
        for product in products {
            prompt.push_str(&product.format_for_prompt());
            prompt.push('\n');
        }
    }

    prompt.push_str("\nNutritional Advice:\n");

    if let Some(question) = question.map(str::trim).filter(|q| !q.is_empty()) {
        let _ = write!(prompt, "\nUser's Question: {}\n", question);
    }
    prompt
}

pub fn meal_plan(preferences: &str, allergies: &str, ingredients: &str) -> String {
    format!(
        "Create a weekly meal plan based on the following preferences and constraints:\n\
         Dietary Preferences: {}\n\
         Allergies: {}\n\
         Available Ingredients: {}\n\n\
         Weekly Meal Plan:\n",
        or_none(preferences),
        or_none(allergies),
        or_none(ingredients)
    )
}

pub fn recommendation(preferences: &str, favorites: &[FavoriteRecipe]) -> String {
    let mut prompt = format!(
        "Based on the following preferences and past favorite recipes, recommend new recipes.\n\
         Preferences: {}\n\n\
         Favorite Recipes:\n",
        or_none(preferences)
    );
    for favorite in favorites {
        let _ = writeln!(prompt, "Recipe: {}", favorite.recipe);
    }
    prompt.push_str("\nRecommended Recipes:\n");
    prompt
}

fn or_none(value: &str) -> &str {
    match value.trim() {
        "" => "none",
        v => v,
    }
}
