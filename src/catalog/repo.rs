use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{FoodItem, NewFoodItem};

/// Food catalog store.
#[async_trait]
pub trait CatalogRepo: Send + Sync {
    /// Every item, in insertion order. The composer depends on this order.
    async fn all(&self) -> anyhow::Result<Vec<FoodItem>>;
    async fn by_category(&self, category: &str) -> anyhow::Result<Vec<FoodItem>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<FoodItem>>;
    async fn create(&self, item: &NewFoodItem) -> anyhow::Result<FoodItem>;
    /// Case-insensitive exact name match.
    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<FoodItem>>;
}

const COLUMNS: &str =
    "id, name, category, calories, protein, fat, carbs, price_per_unit, unit, quantity";

#[derive(Clone)]
pub struct PgCatalogRepo {
    db: PgPool,
}

impl PgCatalogRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogRepo for PgCatalogRepo {
    async fn all(&self) -> anyhow::Result<Vec<FoodItem>> {
        let rows = sqlx::query_as::<_, FoodItem>(&format!(
            "SELECT {COLUMNS} FROM food_items ORDER BY seq ASC"
        ))
        .fetch_all(&self.db)
        .await
        .context("list food items")?;
        Ok(rows)
    }

    async fn by_category(&self, category: &str) -> anyhow::Result<Vec<FoodItem>> {
        let rows = sqlx::query_as::<_, FoodItem>(&format!(
            "SELECT {COLUMNS} FROM food_items WHERE category = $1 ORDER BY seq ASC"
        ))
        .bind(category)
        .fetch_all(&self.db)
        .await
        .context("list food items by category")?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<FoodItem>> {
        let row = sqlx::query_as::<_, FoodItem>(&format!(
            "SELECT {COLUMNS} FROM food_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("get food item")?;
        Ok(row)
    }

    async fn create(&self, item: &NewFoodItem) -> anyhow::Result<FoodItem> {
        let row = sqlx::query_as::<_, FoodItem>(&format!(
            r#"
            INSERT INTO food_items
                (id, name, category, calories, protein, fat, carbs, price_per_unit, unit, quantity)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.calories)
        .bind(item.protein)
        .bind(item.fat)
        .bind(item.carbs)
        .bind(item.price_per_unit)
        .bind(&item.unit)
        .bind(item.quantity)
        .fetch_one(&self.db)
        .await
        .context("insert food item")?;
        Ok(row)
    }

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<FoodItem>> {
        let row = sqlx::query_as::<_, FoodItem>(&format!(
            "SELECT {COLUMNS} FROM food_items WHERE lower(name) = lower($1) ORDER BY seq ASC LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(&self.db)
        .await
        .context("find food item by name")?;
        Ok(row)
    }
}
