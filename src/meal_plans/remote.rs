use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use tracing::{debug, info};

use super::{
    composer::{ComposedMeal, MealSource, Portion},
    repo_types::MealType,
};
use crate::{
    catalog::{CatalogRepo, FoodItem, NewFoodItem},
    errors::{AppError, AppResult},
    nutrition::NutritionTarget,
    recipes::{RecipeDetails, RecipeIngredient, RecipeSource},
};

/// Meals from the recipe service, mapped onto catalog items.
///
/// Not query-only: ingredients missing from the catalog are created on the
/// fly (matched by case-insensitive name).
pub struct RemoteRecipeSource {
    recipes: Arc<dyn RecipeSource>,
    catalog: Arc<dyn CatalogRepo>,
}

impl RemoteRecipeSource {
    pub fn new(recipes: Arc<dyn RecipeSource>, catalog: Arc<dyn CatalogRepo>) -> Self {
        Self { recipes, catalog }
    }
}

/// Looks `ingredient` up by name and creates a catalog entry when it is new.
///
/// A created entry's reference quantity is the recipe amount and its price is
/// an equal share of the recipe's serving price.
pub async fn upsert_ingredient(
    catalog: &dyn CatalogRepo,
    ingredient: &RecipeIngredient,
    price_share: f64,
) -> anyhow::Result<FoodItem> {
    if let Some(existing) = catalog.find_by_name(&ingredient.name).await? {
        return Ok(existing);
    }
    let unit = if ingredient.unit.trim().is_empty() {
        "serving".to_string()
    } else {
        ingredient.unit.clone()
    };
    let created = catalog
        .create(&NewFoodItem {
            name: ingredient.name.clone(),
            category: ingredient.category.clone(),
            calories: ingredient.calories,
            protein: ingredient.protein,
            fat: ingredient.fat,
            carbs: ingredient.carbs,
            price_per_unit: price_share / ingredient.amount,
            unit,
            quantity: ingredient.amount,
        })
        .await?;
    info!(food_item_id = %created.id, name = %created.name, "catalog item created from recipe");
    Ok(created)
}

/// Amount of `item` that one recipe `line` stands for.
///
/// The recipe amount only carries over when it is expressed in the item's own
/// unit; otherwise the line counts as one reference portion of the item.
fn portion_quantity(item: &FoodItem, line: &RecipeIngredient) -> f64 {
    let line_unit = line.unit.trim();
    if line_unit.is_empty() || line_unit.eq_ignore_ascii_case(item.unit.trim()) {
        return line.amount;
    }
    debug!(
        name = %item.name,
        recipe_unit = line_unit,
        catalog_unit = %item.unit,
        "unit mismatch; using the catalog reference quantity"
    );
    item.quantity
}

/// Portions for every usable ingredient line of `recipe`.
pub async fn recipe_portions(
    catalog: &dyn CatalogRepo,
    recipe: &RecipeDetails,
) -> anyhow::Result<Vec<Portion>> {
    let lines: Vec<RecipeIngredient> = recipe
        .ingredients()
        .into_iter()
        .filter(|i| !i.name.trim().is_empty() && i.amount.is_finite() && i.amount > 0.0)
        .collect();
    let price_share = if lines.is_empty() {
        0.0
    } else {
        recipe.serving_price() / lines.len() as f64
    };

    let mut portions = Vec::with_capacity(lines.len());
    // Sequential so two lines with the same name do not both create an entry.
    for line in &lines {
        let item = upsert_ingredient(catalog, line, price_share).await?;
        let quantity = portion_quantity(&item, line);
        portions.push(Portion { item, quantity });
    }
    Ok(portions)
}

#[async_trait]
impl MealSource for RemoteRecipeSource {
    async fn compose_day(
        &self,
        target: &NutritionTarget,
        slot_count: usize,
        day: u32,
        diet: Option<&str>,
    ) -> AppResult<Vec<ComposedMeal>> {
        let timeout_secs = self.recipes.timeout_secs();
        let target_calories = target.calories.round().max(0.0) as u32;

        let plan = self
            .recipes
            .generate_meal_plan(target_calories, diet)
            .await
            .map_err(|e| e.into_app_error(timeout_secs))?;
        if plan.meals.is_empty() {
            return Err(AppError::UpstreamFailure("meal plan contained no meals".into()));
        }
        debug!(day, meals = plan.meals.len(), "remote meal plan received");

        let details = try_join_all(
            plan.meals
                .iter()
                .take(slot_count.max(1))
                .map(|m| self.recipes.recipe_information(m.id)),
        )
        .await
        .map_err(|e| e.into_app_error(timeout_secs))?;

        let mut meals = Vec::with_capacity(details.len());
        for (slot, recipe) in details.iter().enumerate() {
            let portions = recipe_portions(self.catalog.as_ref(), recipe).await?;
            if portions.is_empty() {
                debug!(day, slot, recipe_id = recipe.id, "no usable ingredients; slot left empty");
                continue;
            }
            meals.push(ComposedMeal {
                name: recipe.title.clone(),
                meal_type: MealType::for_slot(slot),
                day,
                portions,
                recipe: recipe.instructions.clone(),
                image_url: recipe.image.clone(),
            });
        }
        if meals.is_empty() {
            return Err(AppError::UpstreamFailure("no recipe had usable ingredients".into()));
        }
        Ok(meals)
    }
}
