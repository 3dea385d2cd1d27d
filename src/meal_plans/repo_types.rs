use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::NutritionTarget;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    /// Slot order within a day: breakfast, lunch, dinner, then snacks.
    pub fn for_slot(slot: usize) -> Self {
        match slot {
            0 => MealType::Breakfast,
            1 => MealType::Lunch,
            2 => MealType::Dinner,
            _ => MealType::Snack,
        }
    }
}

/// Where the meals of a plan came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum PlanSource {
    Remote,
    Local,
}

/// Ingredient reference stored with a meal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealIngredient {
    pub food_item_id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Meal {
    pub id: Uuid,
    pub meal_plan_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub meal_type: MealType,
    pub day: i32,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub price: f64,
    pub recipe: Option<String>,
    pub image_url: Option<String>,
    pub ingredients: Json<Vec<MealIngredient>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub days: i32,
    pub target_calories: f64,
    pub target_protein: f64,
    pub target_fat: f64,
    pub target_carbs: f64,
    pub budget: f64,
    pub total_cost: f64,
    pub source: PlanSource,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl MealPlan {
    pub fn target(&self) -> NutritionTarget {
        NutritionTarget {
            calories: self.target_calories,
            protein_g: self.target_protein,
            fat_g: self.target_fat,
            carbs_g: self.target_carbs,
            budget: self.budget,
        }
    }
}

/// Plan header written together with its meals.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMealPlan {
    pub user_id: Uuid,
    pub days: i32,
    pub target: NutritionTarget,
    pub total_cost: f64,
    pub source: PlanSource,
}
