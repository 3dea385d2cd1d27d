use tracing::info;
use uuid::Uuid;

use super::{
    repo::GroceryRepo,
    services::{add_ingredients, BatchOutcome, IngredientInput},
};
use crate::{
    catalog::CatalogRepo,
    errors::{AppError, AppResult},
    meal_plans::{recipe_portions, PlanRepo},
    recipes::RecipeSource,
};

/// Puts a stored meal's ingredients on the list, tagged with the meal's plan.
/// Without `user_id` the meal's owner is used.
pub async fn add_meal(
    plans: &dyn PlanRepo,
    grocery: &dyn GroceryRepo,
    meal_id: Uuid,
    user_id: Option<Uuid>,
) -> AppResult<BatchOutcome> {
    let meal = plans
        .get_meal(meal_id)
        .await?
        .ok_or(AppError::NotFound("Meal"))?;
    let inputs: Vec<IngredientInput> = meal
        .ingredients
        .iter()
        .map(|i| IngredientInput::new(i.food_item_id, i.quantity))
        .collect();
    let user_id = user_id.unwrap_or(meal.user_id);
    let outcome = add_ingredients(grocery, Some(user_id), Some(meal.meal_plan_id), &inputs).await?;
    info!(%meal_id, %user_id, items = outcome.items.len(), "meal added to grocery list");
    Ok(outcome)
}

/// Fetches a recipe, maps its ingredients onto the catalog (creating missing
/// entries) and adds them to the list.
pub async fn import_recipe(
    recipes: &dyn RecipeSource,
    catalog: &dyn CatalogRepo,
    grocery: &dyn GroceryRepo,
    user_id: Option<Uuid>,
    recipe_id: i64,
    meal_plan_id: Option<Uuid>,
) -> AppResult<BatchOutcome> {
    let user_id = user_id.ok_or_else(|| AppError::validation("user id is required"))?;
    let recipe = recipes
        .recipe_information(recipe_id)
        .await
        .map_err(|e| e.into_app_error(recipes.timeout_secs()))?;
    let portions = recipe_portions(catalog, &recipe).await?;
    let inputs: Vec<IngredientInput> = portions
        .iter()
        .map(|p| IngredientInput::new(p.item.id, p.quantity))
        .collect();
    let outcome = add_ingredients(grocery, Some(user_id), meal_plan_id, &inputs).await?;
    info!(recipe_id, %user_id, items = outcome.items.len(), "recipe imported to grocery list");
    Ok(outcome)
}
