use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewStore, Store};

#[async_trait]
pub trait StoreRepo: Send + Sync {
    async fn all(&self) -> anyhow::Result<Vec<Store>>;
    async fn create(&self, store: &NewStore) -> anyhow::Result<Store>;
}

const COLUMNS: &str = "id, name, address, latitude, longitude, rating, review_count, image_url";

#[derive(Clone)]
pub struct PgStoreRepo {
    db: PgPool,
}

impl PgStoreRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StoreRepo for PgStoreRepo {
    async fn all(&self) -> anyhow::Result<Vec<Store>> {
        let rows = sqlx::query_as::<_, Store>(&format!(
            "SELECT {COLUMNS} FROM stores ORDER BY name ASC"
        ))
        .fetch_all(&self.db)
        .await
        .context("list stores")?;
        Ok(rows)
    }

    async fn create(&self, store: &NewStore) -> anyhow::Result<Store> {
        let row = sqlx::query_as::<_, Store>(&format!(
            r#"
            INSERT INTO stores (id, name, address, latitude, longitude, rating, review_count, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&store.name)
        .bind(&store.address)
        .bind(store.latitude)
        .bind(store.longitude)
        .bind(store.rating)
        .bind(store.review_count)
        .bind(&store.image_url)
        .fetch_one(&self.db)
        .await
        .context("insert store")?;
        Ok(row)
    }
}
