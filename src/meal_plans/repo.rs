use anyhow::Context;
use async_trait::async_trait;
use sqlx::{types::Json, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{
    composer::ComposedMeal,
    repo_types::{Meal, MealPlan, NewMealPlan},
};

/// Plan and meal store.
#[async_trait]
pub trait PlanRepo: Send + Sync {
    /// Writes the plan header and all its meals, or nothing.
    async fn create_plan(
        &self,
        plan: &NewMealPlan,
        meals: &[ComposedMeal],
    ) -> anyhow::Result<(MealPlan, Vec<Meal>)>;
    async fn get_plan(&self, id: Uuid) -> anyhow::Result<Option<MealPlan>>;
    /// Most recently created plan of a user.
    async fn latest_for_user(&self, user_id: Uuid) -> anyhow::Result<Option<MealPlan>>;
    async fn meals_for_plan(&self, plan_id: Uuid) -> anyhow::Result<Vec<Meal>>;
    /// Meals of the user's latest plan for one day.
    async fn meals_for_user_day(&self, user_id: Uuid, day: i32) -> anyhow::Result<Vec<Meal>>;
    async fn get_meal(&self, id: Uuid) -> anyhow::Result<Option<Meal>>;
}

const PLAN_COLUMNS: &str = "id, user_id, days, target_calories, target_protein, target_fat, \
                            target_carbs, budget, total_cost, source, created_at";

const MEAL_COLUMNS: &str = "id, meal_plan_id, user_id, name, meal_type, day, calories, protein, \
                            fat, carbs, price, recipe, image_url, ingredients";

#[derive(Clone)]
pub struct PgPlanRepo {
    db: PgPool,
}

impl PgPlanRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

async fn insert_plan_tx(
    tx: &mut Transaction<'_, Postgres>,
    plan: &NewMealPlan,
) -> anyhow::Result<MealPlan> {
    let row = sqlx::query_as::<_, MealPlan>(&format!(
        r#"
        INSERT INTO meal_plans (id, user_id, days, target_calories, target_protein, target_fat,
                                target_carbs, budget, total_cost, source)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {PLAN_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(plan.user_id)
    .bind(plan.days)
    .bind(plan.target.calories)
    .bind(plan.target.protein_g)
    .bind(plan.target.fat_g)
    .bind(plan.target.carbs_g)
    .bind(plan.target.budget)
    .bind(plan.total_cost)
    .bind(plan.source)
    .fetch_one(&mut **tx)
    .await
    .context("insert meal plan")?;
    Ok(row)
}

async fn insert_meal_tx(
    tx: &mut Transaction<'_, Postgres>,
    plan: &MealPlan,
    position: i32,
    meal: &ComposedMeal,
) -> anyhow::Result<Meal> {
    let totals = meal.totals();
    let row = sqlx::query_as::<_, Meal>(&format!(
        r#"
        INSERT INTO meals (id, meal_plan_id, user_id, position, name, meal_type, day,
                           calories, protein, fat, carbs, price, recipe, image_url, ingredients)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        RETURNING {MEAL_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(plan.id)
    .bind(plan.user_id)
    .bind(position)
    .bind(&meal.name)
    .bind(meal.meal_type)
    .bind(i32::try_from(meal.day).context("day index out of range")?)
    .bind(totals.calories)
    .bind(totals.protein)
    .bind(totals.fat)
    .bind(totals.carbs)
    .bind(totals.price)
    .bind(&meal.recipe)
    .bind(&meal.image_url)
    .bind(Json(meal.ingredient_refs()))
    .fetch_one(&mut **tx)
    .await
    .context("insert meal")?;
    Ok(row)
}

#[async_trait]
impl PlanRepo for PgPlanRepo {
    async fn create_plan(
        &self,
        plan: &NewMealPlan,
        meals: &[ComposedMeal],
    ) -> anyhow::Result<(MealPlan, Vec<Meal>)> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        let stored = insert_plan_tx(&mut tx, plan).await?;
        let mut rows = Vec::with_capacity(meals.len());
        for (position, meal) in meals.iter().enumerate() {
            let position = i32::try_from(position).context("too many meals")?;
            rows.push(insert_meal_tx(&mut tx, &stored, position, meal).await?);
        }
        tx.commit().await.context("commit tx")?;
        Ok((stored, rows))
    }

    async fn get_plan(&self, id: Uuid) -> anyhow::Result<Option<MealPlan>> {
        let row = sqlx::query_as::<_, MealPlan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM meal_plans WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("get meal plan")?;
        Ok(row)
    }

    async fn latest_for_user(&self, user_id: Uuid) -> anyhow::Result<Option<MealPlan>> {
        let row = sqlx::query_as::<_, MealPlan>(&format!(
            r#"
            SELECT {PLAN_COLUMNS}
              FROM meal_plans
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT 1
            "#
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("latest meal plan for user")?;
        Ok(row)
    }

    async fn meals_for_plan(&self, plan_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(&format!(
            "SELECT {MEAL_COLUMNS} FROM meals WHERE meal_plan_id = $1 ORDER BY day ASC, position ASC"
        ))
        .bind(plan_id)
        .fetch_all(&self.db)
        .await
        .context("list meals of plan")?;
        Ok(rows)
    }

    async fn meals_for_user_day(&self, user_id: Uuid, day: i32) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(&format!(
            r#"
            SELECT {MEAL_COLUMNS}
              FROM meals
             WHERE day = $2
               AND meal_plan_id = (SELECT id FROM meal_plans
                                    WHERE user_id = $1
                                    ORDER BY created_at DESC
                                    LIMIT 1)
             ORDER BY position ASC
            "#
        ))
        .bind(user_id)
        .bind(day)
        .fetch_all(&self.db)
        .await
        .context("list meals of user day")?;
        Ok(rows)
    }

    async fn get_meal(&self, id: Uuid) -> anyhow::Result<Option<Meal>> {
        let row = sqlx::query_as::<_, Meal>(&format!(
            "SELECT {MEAL_COLUMNS} FROM meals WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("get meal")?;
        Ok(row)
    }
}
