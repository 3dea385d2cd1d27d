use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::catalog::FoodItem;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct GroceryItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_item_id: Uuid,
    pub quantity: f64,
    pub purchased: bool,
    pub meal_plan_id: Option<Uuid>,
}

/// A grocery row joined with the catalog item it refers to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroceryItemDetails {
    #[serde(flatten)]
    pub item: GroceryItem,
    pub food_item: FoodItem,
}

impl GroceryItemDetails {
    pub fn cost(&self) -> f64 {
        self.food_item.price_per_unit * self.item.quantity
    }
}

/// Partial update of one grocery row.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct GroceryChange {
    pub purchased: Option<bool>,
    pub quantity: Option<f64>,
}

impl GroceryChange {
    pub fn is_empty(&self) -> bool {
        self.purchased.is_none() && self.quantity.is_none()
    }

    pub fn check(&self) -> Result<(), &'static str> {
        if self.is_empty() {
            return Err("nothing to update");
        }
        match self.quantity {
            Some(q) if !q.is_finite() || q <= 0.0 => Err("quantity must be a positive number"),
            _ => Ok(()),
        }
    }
}
