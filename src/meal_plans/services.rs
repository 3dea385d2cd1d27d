use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    composer::ComposedMeal,
    repo_types::{Meal, MealPlan, NewMealPlan, PlanSource},
};
use crate::{
    errors::{AppError, AppResult},
    grocery::{add_ingredients, IngredientInput},
    nutrition::{evaluate, NutritionTarget, Profile},
    state::AppState,
};

pub const MAX_PLAN_DAYS: u32 = 7;

#[derive(Debug, Clone)]
pub struct GenerateInput {
    pub user_id: Uuid,
    /// Falls back to the stored profile when absent.
    pub profile: Option<Profile>,
    pub days: u32,
    pub diet: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeneratedPlan {
    pub plan: MealPlan,
    pub meals: Vec<Meal>,
    pub target: NutritionTarget,
    /// Rows touched when seeding the grocery list; 0 if seeding failed.
    pub grocery_items: usize,
}

/// Evaluates the profile, composes every day, stores plan and meals in one
/// transaction, then seeds the grocery list. Nothing is written when
/// composition fails.
#[instrument(skip(state, input), fields(user_id = %input.user_id, days = input.days))]
pub async fn generate_plan(state: &AppState, input: GenerateInput) -> AppResult<GeneratedPlan> {
    if !(1..=MAX_PLAN_DAYS).contains(&input.days) {
        return Err(AppError::validation(format!(
            "days must be between 1 and {MAX_PLAN_DAYS}"
        )));
    }
    if let Some(profile) = &input.profile {
        profile.validate()?;
    }

    let user = state
        .users
        .get(input.user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    let profile = match input.profile {
        Some(p) => p,
        None => user
            .profile()
            .ok_or_else(|| AppError::validation("profile is incomplete"))?,
    };

    let target = evaluate(&profile);
    if !(target.calories.is_finite() && target.calories > 0.0) {
        return Err(AppError::validation("could not compute a daily calorie target"));
    }

    let composer = state.composer();
    let mut try_remote = composer.has_remote();
    let mut source = if try_remote {
        PlanSource::Remote
    } else {
        PlanSource::Local
    };
    let mut composed: Vec<ComposedMeal> = Vec::new();
    for day in 1..=input.days {
        let (day_source, meals) = composer
            .compose_day(&target, day, input.diet.as_deref(), try_remote)
            .await?;
        if day_source == PlanSource::Local {
            // A timed out service is not retried for the remaining days.
            try_remote = false;
            source = PlanSource::Local;
        }
        composed.extend(meals);
    }

    let total_cost: f64 = composed.iter().map(|m| m.totals().price).sum();
    let new_plan = NewMealPlan {
        user_id: user.id,
        days: i32::try_from(input.days).map_err(anyhow::Error::from)?,
        target,
        total_cost,
        source,
    };
    let (plan, meals) = state.plans.create_plan(&new_plan, &composed).await?;
    info!(
        plan_id = %plan.id,
        meals = meals.len(),
        total_cost,
        source = ?plan.source,
        "meal plan stored"
    );

    let grocery_items = seed_grocery(state, &plan, &meals).await;

    Ok(GeneratedPlan {
        plan,
        meals,
        target,
        grocery_items,
    })
}

/// Puts every ingredient of the new plan on the user's list. A failure here
/// does not undo the plan.
async fn seed_grocery(state: &AppState, plan: &MealPlan, meals: &[Meal]) -> usize {
    let inputs: Vec<IngredientInput> = meals
        .iter()
        .flat_map(|m| m.ingredients.iter())
        .map(|i| IngredientInput::new(i.food_item_id, i.quantity))
        .collect();
    if inputs.is_empty() {
        return 0;
    }
    match add_ingredients(state.grocery.as_ref(), Some(plan.user_id), Some(plan.id), &inputs).await
    {
        Ok(outcome) => outcome.items.len(),
        Err(e) => {
            warn!(plan_id = %plan.id, error = %e, "grocery seeding failed");
            0
        }
    }
}
