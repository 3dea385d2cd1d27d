//! Meal composition: one trait for the two ingredient sources and the
//! orchestrator that races the remote one against a timer.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use super::{
    local::LocalCatalogSource,
    remote::RemoteRecipeSource,
    repo_types::{MealIngredient, MealType, PlanSource},
};
use crate::{
    catalog::FoodItem,
    errors::{AppError, AppResult},
    nutrition::NutritionTarget,
};

/// A catalog item taken in `quantity` of its unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Portion {
    pub item: FoodItem,
    pub quantity: f64,
}

impl Portion {
    pub fn totals(&self) -> MacroTotals {
        let k = self.item.scale(self.quantity);
        MacroTotals {
            calories: self.item.calories * k,
            protein: self.item.protein * k,
            fat: self.item.fat * k,
            carbs: self.item.carbs * k,
            price: self.item.price_per_unit * self.quantity,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub price: f64,
}

impl std::ops::Add for MacroTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            fat: self.fat + rhs.fat,
            carbs: self.carbs + rhs.carbs,
            price: self.price + rhs.price,
        }
    }
}

impl std::iter::Sum for MacroTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, t| acc + t)
    }
}

/// A meal before it is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedMeal {
    pub name: String,
    pub meal_type: MealType,
    pub day: u32,
    pub portions: Vec<Portion>,
    pub recipe: Option<String>,
    pub image_url: Option<String>,
}

impl ComposedMeal {
    /// Sum over portions; the only place meal totals are derived.
    pub fn totals(&self) -> MacroTotals {
        self.portions.iter().map(Portion::totals).sum()
    }

    pub fn ingredient_refs(&self) -> Vec<MealIngredient> {
        self.portions
            .iter()
            .map(|p| MealIngredient {
                food_item_id: p.item.id,
                name: p.item.name.clone(),
                quantity: p.quantity,
                unit: p.item.unit.clone(),
            })
            .collect()
    }
}

/// A strategy producing one day of meals.
#[async_trait]
pub trait MealSource: Send + Sync {
    async fn compose_day(
        &self,
        target: &NutritionTarget,
        slot_count: usize,
        day: u32,
        diet: Option<&str>,
    ) -> AppResult<Vec<ComposedMeal>>;
}

/// Tries the remote recipe strategy first and falls back to the local catalog
/// only when the remote one times out.
pub struct MealComposer {
    local: LocalCatalogSource,
    remote: Option<RemoteRecipeSource>,
    timeout: Duration,
    slot_count: usize,
}

impl MealComposer {
    pub fn new(
        local: LocalCatalogSource,
        remote: Option<RemoteRecipeSource>,
        timeout: Duration,
        slot_count: usize,
    ) -> Self {
        Self {
            local,
            remote,
            timeout,
            slot_count: slot_count.max(1),
        }
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Meals for one day and the strategy that produced them.
    /// `try_remote = false` skips straight to the local catalog.
    pub async fn compose_day(
        &self,
        target: &NutritionTarget,
        day: u32,
        diet: Option<&str>,
        try_remote: bool,
    ) -> AppResult<(PlanSource, Vec<ComposedMeal>)> {
        if let (Some(remote), true) = (&self.remote, try_remote) {
            let attempt = tokio::time::timeout(
                self.timeout,
                remote.compose_day(target, self.slot_count, day, diet),
            )
            .await;
            match attempt {
                Ok(Ok(meals)) => {
                    info!(day, meals = meals.len(), "meals composed from recipe service");
                    return Ok((PlanSource::Remote, meals));
                }
                Ok(Err(AppError::UpstreamTimeout(_))) | Err(_) => {
                    warn!(
                        day,
                        timeout_secs = self.timeout.as_secs(),
                        "recipe service timed out; falling back to local catalog"
                    );
                }
                Ok(Err(e)) => return Err(e),
            }
        }

        let meals = self
            .local
            .compose_day(target, self.slot_count, day, diet)
            .await?;
        info!(day, meals = meals.len(), "meals composed from local catalog");
        Ok((PlanSource::Local, meals))
    }
}
