pub mod favorite_recipes;
pub mod products;
