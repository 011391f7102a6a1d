/// One user interaction, already parsed from whatever surface produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Help,
    ListFavorites,
    AddFavorite { name: String, recipe: String },
    UpdateFavorite { id: i64, name: String, recipe: String },
    DeleteFavorite { id: i64 },
    ListProducts,
    AddProduct { name: String, quantity: i64 },
    UpdateProduct { id: i64, name: String, quantity: i64 },
    DeleteProduct { id: i64 },
    Generate { ingredients: String },
    SaveGenerated,
    StartChat,
    Ask { question: String },
    ShowChat,
    PlanMeals {
        preferences: String,
        allergies: String,
        ingredients: String,
    },
    ShowPlan,
    Recommend { preferences: String },
    Classify { image: Vec<u8> },
    FindVideo { query: String },
}
