use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Catalog entry. Nutrients are given per `quantity` of `unit`,
/// the price per single `unit`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct FoodItem {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub price_per_unit: f64,
    pub unit: String,
    pub quantity: f64,
}

impl FoodItem {
    /// Factor applied to the per-reference nutrients for `amount` units.
    pub fn scale(&self, amount: f64) -> f64 {
        if self.quantity > 0.0 {
            amount / self.quantity
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewFoodItem {
    pub name: String,
    pub category: String,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub price_per_unit: f64,
    pub unit: String,
    pub quantity: f64,
}

impl NewFoodItem {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("name is required"));
        }
        if self.category.trim().is_empty() {
            return Err(AppError::validation("category is required"));
        }
        if self.unit.trim().is_empty() {
            return Err(AppError::validation("unit is required"));
        }
        let nutrients = [self.calories, self.protein, self.fat, self.carbs, self.price_per_unit];
        if nutrients.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(AppError::validation("nutrients and price must be non-negative"));
        }
        if !(self.quantity.is_finite() && self.quantity > 0.0) {
            return Err(AppError::validation("quantity must be positive"));
        }
        Ok(())
    }
}
