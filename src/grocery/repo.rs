use anyhow::Context;
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::repo_types::{GroceryChange, GroceryItem, GroceryItemDetails};
use crate::catalog::FoodItem;

/// Grocery list store.
#[async_trait]
pub trait GroceryRepo: Send + Sync {
    /// Row for the (user, food item, plan) key. A `None` plan only matches
    /// rows without a plan.
    async fn find_by_key(
        &self,
        user_id: Uuid,
        food_item_id: Uuid,
        meal_plan_id: Option<Uuid>,
    ) -> anyhow::Result<Option<GroceryItem>>;
    async fn insert(
        &self,
        user_id: Uuid,
        food_item_id: Uuid,
        quantity: f64,
        meal_plan_id: Option<Uuid>,
    ) -> anyhow::Result<GroceryItem>;
    /// Increments quantity; `purchased` is left as is.
    async fn add_quantity(&self, id: Uuid, delta: f64) -> anyhow::Result<GroceryItem>;
    async fn update(&self, id: Uuid, change: &GroceryChange)
        -> anyhow::Result<Option<GroceryItem>>;
    async fn list_with_details(&self, user_id: Uuid) -> anyhow::Result<Vec<GroceryItemDetails>>;
}

const COLUMNS: &str = "id, user_id, food_item_id, quantity, purchased, meal_plan_id";

#[derive(Clone)]
pub struct PgGroceryRepo {
    db: PgPool,
}

impl PgGroceryRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[derive(FromRow)]
struct DetailsRow {
    id: Uuid,
    user_id: Uuid,
    food_item_id: Uuid,
    quantity: f64,
    purchased: bool,
    meal_plan_id: Option<Uuid>,
    fi_name: String,
    fi_category: String,
    fi_calories: f64,
    fi_protein: f64,
    fi_fat: f64,
    fi_carbs: f64,
    fi_price_per_unit: f64,
    fi_unit: String,
    fi_quantity: f64,
}

impl From<DetailsRow> for GroceryItemDetails {
    fn from(r: DetailsRow) -> Self {
        Self {
            item: GroceryItem {
                id: r.id,
                user_id: r.user_id,
                food_item_id: r.food_item_id,
                quantity: r.quantity,
                purchased: r.purchased,
                meal_plan_id: r.meal_plan_id,
            },
            food_item: FoodItem {
                id: r.food_item_id,
                name: r.fi_name,
                category: r.fi_category,
                calories: r.fi_calories,
                protein: r.fi_protein,
                fat: r.fi_fat,
                carbs: r.fi_carbs,
                price_per_unit: r.fi_price_per_unit,
                unit: r.fi_unit,
                quantity: r.fi_quantity,
            },
        }
    }
}

#[async_trait]
impl GroceryRepo for PgGroceryRepo {
    async fn find_by_key(
        &self,
        user_id: Uuid,
        food_item_id: Uuid,
        meal_plan_id: Option<Uuid>,
    ) -> anyhow::Result<Option<GroceryItem>> {
        let row = sqlx::query_as::<_, GroceryItem>(&format!(
            r#"
            SELECT {COLUMNS}
              FROM grocery_items
             WHERE user_id = $1
               AND food_item_id = $2
               AND meal_plan_id IS NOT DISTINCT FROM $3
             LIMIT 1
            "#
        ))
        .bind(user_id)
        .bind(food_item_id)
        .bind(meal_plan_id)
        .fetch_optional(&self.db)
        .await
        .context("find grocery item by key")?;
        Ok(row)
    }

    async fn insert(
        &self,
        user_id: Uuid,
        food_item_id: Uuid,
        quantity: f64,
        meal_plan_id: Option<Uuid>,
    ) -> anyhow::Result<GroceryItem> {
        let row = sqlx::query_as::<_, GroceryItem>(&format!(
            r#"
            INSERT INTO grocery_items (id, user_id, food_item_id, quantity, purchased, meal_plan_id)
            VALUES ($1, $2, $3, $4, FALSE, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(food_item_id)
        .bind(quantity)
        .bind(meal_plan_id)
        .fetch_one(&self.db)
        .await
        .context("insert grocery item")?;
        Ok(row)
    }

    async fn add_quantity(&self, id: Uuid, delta: f64) -> anyhow::Result<GroceryItem> {
        let row = sqlx::query_as::<_, GroceryItem>(&format!(
            "UPDATE grocery_items SET quantity = quantity + $2 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(delta)
        .fetch_one(&self.db)
        .await
        .context("increment grocery quantity")?;
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        change: &GroceryChange,
    ) -> anyhow::Result<Option<GroceryItem>> {
        let row = sqlx::query_as::<_, GroceryItem>(&format!(
            r#"
            UPDATE grocery_items SET
                purchased = COALESCE($2, purchased),
                quantity  = COALESCE($3, quantity)
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(change.purchased)
        .bind(change.quantity)
        .fetch_optional(&self.db)
        .await
        .context("update grocery item")?;
        Ok(row)
    }

    async fn list_with_details(&self, user_id: Uuid) -> anyhow::Result<Vec<GroceryItemDetails>> {
        let rows = sqlx::query_as::<_, DetailsRow>(
            r#"
            SELECT g.id, g.user_id, g.food_item_id, g.quantity, g.purchased, g.meal_plan_id,
                   f.name AS fi_name, f.category AS fi_category, f.calories AS fi_calories,
                   f.protein AS fi_protein, f.fat AS fi_fat, f.carbs AS fi_carbs,
                   f.price_per_unit AS fi_price_per_unit, f.unit AS fi_unit,
                   f.quantity AS fi_quantity
              FROM grocery_items g
              JOIN food_items f ON f.id = g.food_item_id
             WHERE g.user_id = $1
             ORDER BY g.created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list grocery items")?;
        Ok(rows.into_iter().map(GroceryItemDetails::from).collect())
    }
}
