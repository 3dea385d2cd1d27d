use serde::Deserialize;
use uuid::Uuid;

use super::services::{IngredientInput, ItemUpdate};

#[derive(Debug, Deserialize)]
pub struct AddGroceryItemRequest {
    pub user_id: Uuid,
    pub food_item_id: Option<Uuid>,
    pub quantity: f64,
    pub meal_plan_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct BatchAddRequest {
    pub user_id: Option<Uuid>,
    pub meal_plan_id: Option<Uuid>,
    pub items: Vec<IngredientInput>,
}

#[derive(Debug, Deserialize)]
pub struct BatchUpdateRequest {
    pub items: Vec<ItemUpdate>,
}

#[derive(Debug, Deserialize)]
pub struct FromMealRequest {
    pub meal_id: Uuid,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct FromRecipeRequest {
    pub user_id: Option<Uuid>,
    pub recipe_id: i64,
    pub meal_plan_id: Option<Uuid>,
}
