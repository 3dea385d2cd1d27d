use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{ProfileFields, User};

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn get_by_telegram_id(&self, telegram_id: &str) -> anyhow::Result<Option<User>>;
    async fn create(
        &self,
        username: &str,
        telegram_id: Option<&str>,
        profile: &ProfileFields,
    ) -> anyhow::Result<User>;
    /// Overwrites the provided profile columns. `None` when the user does not exist.
    async fn update_profile(&self, id: Uuid, profile: &ProfileFields)
        -> anyhow::Result<Option<User>>;
}

const COLUMNS: &str = "id, username, telegram_id, age, gender, weight_kg, height_cm, \
                       activity_level, goal, daily_budget, created_at";

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("get user")?;
        Ok(user)
    }

    async fn get_by_telegram_id(&self, telegram_id: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users WHERE telegram_id = $1"
        ))
        .bind(telegram_id)
        .fetch_optional(&self.db)
        .await
        .context("get user by telegram id")?;
        Ok(user)
    }

    async fn create(
        &self,
        username: &str,
        telegram_id: Option<&str>,
        p: &ProfileFields,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, username, telegram_id, age, gender, weight_kg, height_cm,
                               activity_level, goal, daily_budget)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(telegram_id)
        .bind(p.age)
        .bind(p.gender)
        .bind(p.weight_kg)
        .bind(p.height_cm)
        .bind(p.activity_level)
        .bind(p.goal)
        .bind(p.daily_budget)
        .fetch_one(&self.db)
        .await
        .context("insert user")?;
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        p: &ProfileFields,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                age            = COALESCE($2, age),
                gender         = COALESCE($3, gender),
                weight_kg      = COALESCE($4, weight_kg),
                height_cm      = COALESCE($5, height_cm),
                activity_level = COALESCE($6, activity_level),
                goal           = COALESCE($7, goal),
                daily_budget   = COALESCE($8, daily_budget)
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(p.age)
        .bind(p.gender)
        .bind(p.weight_kg)
        .bind(p.height_cm)
        .bind(p.activity_level)
        .bind(p.goal)
        .bind(p.daily_budget)
        .fetch_optional(&self.db)
        .await
        .context("update user profile")?;
        Ok(user)
    }
}
