use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{
    composer::{ComposedMeal, MealSource, Portion},
    repo_types::MealType,
};
use crate::{
    catalog::{CatalogRepo, FoodItem},
    errors::{AppError, AppResult},
    nutrition::NutritionTarget,
};

/// Upper bound of a slot's running calorie sum, as a share of its sub-target.
const SLOT_CEILING: f64 = 1.1;
/// A slot stops taking items once its running sum reaches this share.
const SLOT_FLOOR: f64 = 0.9;
pub const MAX_INGREDIENTS_PER_MEAL: usize = 3;

/// Greedy selection over `catalog` in its given order.
///
/// Each slot receives `target.calories / slot_count`. An item is taken when it
/// keeps the slot's sum within 110 % of that, and no item is taken twice in
/// one call. A slot that took nothing gets the first unused item instead.
/// Meals are cut to [`MAX_INGREDIENTS_PER_MEAL`] after selection; slots that
/// find the catalog exhausted are left out.
pub fn compose(
    target: &NutritionTarget,
    catalog: &[FoodItem],
    slot_count: usize,
    day: u32,
) -> Vec<ComposedMeal> {
    let slot_count = slot_count.max(1);
    let sub_target = target.calories / slot_count as f64;
    let ceiling = sub_target * SLOT_CEILING;
    let floor = sub_target * SLOT_FLOOR;

    let mut used = vec![false; catalog.len()];
    let mut meals = Vec::with_capacity(slot_count);

    for slot in 0..slot_count {
        let mut picked: Vec<usize> = Vec::new();
        let mut sum = 0.0;

        for (idx, item) in catalog.iter().enumerate() {
            if used[idx] || sum + item.calories > ceiling {
                continue;
            }
            used[idx] = true;
            picked.push(idx);
            sum += item.calories;
            if sum >= floor {
                break;
            }
        }

        if picked.is_empty() {
            if let Some(idx) = used.iter().position(|u| !u) {
                used[idx] = true;
                picked.push(idx);
            }
        }

        picked.truncate(MAX_INGREDIENTS_PER_MEAL);
        if picked.is_empty() {
            debug!(day, slot, "catalog exhausted; slot left empty");
            continue;
        }

        let portions: Vec<Portion> = picked
            .iter()
            .map(|&idx| Portion {
                item: catalog[idx].clone(),
                quantity: catalog[idx].quantity,
            })
            .collect();
        let name = portions
            .iter()
            .map(|p| p.item.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        meals.push(ComposedMeal {
            name,
            meal_type: MealType::for_slot(slot),
            day,
            portions,
            recipe: None,
            image_url: None,
        });
    }

    meals
}

/// Meals from the shared food catalog.
pub struct LocalCatalogSource {
    catalog: Arc<dyn CatalogRepo>,
}

impl LocalCatalogSource {
    pub fn new(catalog: Arc<dyn CatalogRepo>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl MealSource for LocalCatalogSource {
    async fn compose_day(
        &self,
        target: &NutritionTarget,
        slot_count: usize,
        day: u32,
        _diet: Option<&str>,
    ) -> AppResult<Vec<ComposedMeal>> {
        let catalog = self.catalog.all().await?;
        if catalog.is_empty() {
            return Err(AppError::DataUnavailable("food catalog is empty"));
        }
        Ok(compose(target, &catalog, slot_count, day))
    }
}
