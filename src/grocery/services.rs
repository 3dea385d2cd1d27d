//! Grocery aggregation: merges meal ingredients into one deduplicated list
//! per (user, food item, plan).

use std::collections::HashMap;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{
    repo::GroceryRepo,
    repo_types::{GroceryChange, GroceryItem},
};
use crate::errors::{AppError, AppResult};

/// One ingredient to put on the list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IngredientInput {
    pub food_item_id: Option<Uuid>,
    pub quantity: f64,
}

impl IngredientInput {
    pub fn new(food_item_id: Uuid, quantity: f64) -> Self {
        Self {
            food_item_id: Some(food_item_id),
            quantity,
        }
    }

    fn check(&self) -> Result<Uuid, &'static str> {
        let id = self.food_item_id.ok_or("food item id is required")?;
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err("quantity must be a positive number");
        }
        Ok(id)
    }
}

/// One update of a batch update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ItemUpdate {
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub change: GroceryChange,
}

/// An entry of a batch that was not applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rejected {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BatchOutcome {
    pub items: Vec<GroceryItem>,
    pub rejected: Vec<Rejected>,
}

/// Adds `quantity` to the row keyed by (user, food item, plan), creating it
/// when absent. An existing row keeps its purchased flag.
pub async fn upsert(
    repo: &dyn GroceryRepo,
    user_id: Uuid,
    food_item_id: Uuid,
    quantity: f64,
    meal_plan_id: Option<Uuid>,
) -> anyhow::Result<GroceryItem> {
    match repo.find_by_key(user_id, food_item_id, meal_plan_id).await? {
        Some(existing) => {
            debug!(grocery_item_id = %existing.id, quantity, "grocery quantity incremented");
            repo.add_quantity(existing.id, quantity).await
        }
        None => repo.insert(user_id, food_item_id, quantity, meal_plan_id).await,
    }
}

/// Adds a single validated ingredient.
pub async fn add_one(
    repo: &dyn GroceryRepo,
    user_id: Uuid,
    input: IngredientInput,
    meal_plan_id: Option<Uuid>,
) -> AppResult<GroceryItem> {
    let food_item_id = input.check().map_err(AppError::validation)?;
    Ok(upsert(repo, user_id, food_item_id, input.quantity, meal_plan_id).await?)
}

/// Batch add. Invalid entries and failed writes are reported in
/// [`BatchOutcome::rejected`]; the call fails only when the user id is absent
/// or no entry is valid.
///
/// Entries naming the same food item are summed first, so one batch never
/// writes the same key twice.
pub async fn add_ingredients(
    repo: &dyn GroceryRepo,
    user_id: Option<Uuid>,
    meal_plan_id: Option<Uuid>,
    inputs: &[IngredientInput],
) -> AppResult<BatchOutcome> {
    let user_id = user_id.ok_or_else(|| AppError::validation("user id is required"))?;

    let mut rejected = Vec::new();
    let mut merged: Vec<(usize, Uuid, f64)> = Vec::new();
    let mut slot_of: HashMap<Uuid, usize> = HashMap::new();

    for (index, input) in inputs.iter().enumerate() {
        match input.check() {
            Ok(food_item_id) => match slot_of.get(&food_item_id) {
                Some(&slot) => merged[slot].2 += input.quantity,
                None => {
                    slot_of.insert(food_item_id, merged.len());
                    merged.push((index, food_item_id, input.quantity));
                }
            },
            Err(reason) => {
                warn!(%user_id, index, reason, "grocery entry rejected");
                rejected.push(Rejected {
                    index,
                    reason: reason.to_string(),
                });
            }
        }
    }

    if merged.is_empty() {
        return Err(AppError::validation("no valid grocery entries"));
    }

    let results = join_all(
        merged
            .iter()
            .map(|&(_, food_item_id, quantity)| {
                upsert(repo, user_id, food_item_id, quantity, meal_plan_id)
            }),
    )
    .await;

    let mut items = Vec::with_capacity(results.len());
    for ((index, food_item_id, _), result) in merged.iter().zip(results) {
        match result {
            Ok(item) => items.push(item),
            Err(e) => {
                warn!(%user_id, %food_item_id, error = %e, "grocery write failed");
                rejected.push(Rejected {
                    index: *index,
                    reason: "could not be saved".to_string(),
                });
            }
        }
    }
    rejected.sort_by_key(|r| r.index);

    info!(
        %user_id,
        added = items.len(),
        rejected = rejected.len(),
        "grocery batch applied"
    );
    Ok(BatchOutcome { items, rejected })
}

/// Updates one row. `NotFound` when it does not exist.
pub async fn update_one(
    repo: &dyn GroceryRepo,
    id: Uuid,
    change: &GroceryChange,
) -> AppResult<GroceryItem> {
    change.check().map_err(AppError::validation)?;
    repo.update(id, change)
        .await?
        .ok_or(AppError::NotFound("Grocery item"))
}

/// Batch update with the same per-entry tolerance as [`add_ingredients`].
pub async fn batch_update(repo: &dyn GroceryRepo, updates: &[ItemUpdate]) -> AppResult<BatchOutcome> {
    let mut rejected = Vec::new();
    let mut valid = Vec::new();
    for (index, update) in updates.iter().enumerate() {
        let checked = update
            .id
            .ok_or("grocery item id is required")
            .and_then(|id| update.change.check().map(|_| id));
        match checked {
            Ok(id) => valid.push((index, id, update.change)),
            Err(reason) => {
                warn!(index, reason, "grocery update rejected");
                rejected.push(Rejected {
                    index,
                    reason: reason.to_string(),
                });
            }
        }
    }

    if valid.is_empty() {
        return Err(AppError::validation("no valid grocery updates"));
    }

    let results = join_all(valid.iter().map(|(_, id, change)| repo.update(*id, change))).await;

    let mut items = Vec::with_capacity(results.len());
    for ((index, id, _), result) in valid.iter().zip(results) {
        let reason = match result {
            Ok(Some(item)) => {
                items.push(item);
                continue;
            }
            Ok(None) => "grocery item not found",
            Err(e) => {
                warn!(grocery_item_id = %id, error = %e, "grocery update failed");
                "could not be saved"
            }
        };
        rejected.push(Rejected {
            index: *index,
            reason: reason.to_string(),
        });
    }
    rejected.sort_by_key(|r| r.index);
    Ok(BatchOutcome { items, rejected })
}
