use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::{Meal, MealIngredient, MealPlan, MealType, PlanSource};
use crate::nutrition::{Profile, RoundedTarget};

#[derive(Debug, Deserialize)]
pub struct GeneratePlanRequest {
    pub user_id: Uuid,
    pub profile: Option<Profile>,
    pub days: Option<u32>,
    pub diet: Option<String>,
}

/// Meal as shown in the app: macros rounded to whole grams, price to cents.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MealView {
    pub id: Uuid,
    pub name: String,
    pub meal_type: MealType,
    pub day: i32,
    pub calories: i64,
    pub protein: i64,
    pub fat: i64,
    pub carbs: i64,
    pub price: f64,
    pub recipe: Option<String>,
    pub image_url: Option<String>,
    pub ingredients: Vec<MealIngredient>,
}

fn cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

impl From<&Meal> for MealView {
    fn from(m: &Meal) -> Self {
        Self {
            id: m.id,
            name: m.name.clone(),
            meal_type: m.meal_type,
            day: m.day,
            calories: m.calories.round() as i64,
            protein: m.protein.round() as i64,
            fat: m.fat.round() as i64,
            carbs: m.carbs.round() as i64,
            price: cents(m.price),
            recipe: m.recipe.clone(),
            image_url: m.image_url.clone(),
            ingredients: m.ingredients.0.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub days: i32,
    pub source: PlanSource,
    pub daily_nutrition: RoundedTarget,
    pub total_cost: f64,
    pub created_at: String,
    pub meals: Vec<MealView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grocery_items: Option<usize>,
}

impl PlanResponse {
    pub fn new(plan: &MealPlan, meals: &[Meal]) -> Self {
        Self {
            id: plan.id,
            user_id: plan.user_id,
            days: plan.days,
            source: plan.source,
            daily_nutrition: plan.target().rounded(),
            total_cost: cents(plan.total_cost),
            created_at: plan
                .created_at
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_default(),
            meals: meals.iter().map(MealView::from).collect(),
            grocery_items: None,
        }
    }
}
