use std::{sync::Arc, time::Duration};

use sqlx::PgPool;
use tracing::info;

use crate::catalog::{CatalogRepo, PgCatalogRepo};
use crate::config::AppConfig;
use crate::grocery::{GroceryRepo, PgGroceryRepo};
use crate::meal_plans::{
    LocalCatalogSource, MealComposer, PgPlanRepo, PlanRepo, RemoteRecipeSource,
};
use crate::recipes::{RecipeSource, SpoonacularClient};
use crate::stores::{PgStoreRepo, StoreRepo};
use crate::users::{PgUserRepo, UserRepo};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub catalog: Arc<dyn CatalogRepo>,
    pub users: Arc<dyn UserRepo>,
    pub plans: Arc<dyn PlanRepo>,
    pub grocery: Arc<dyn GroceryRepo>,
    pub stores: Arc<dyn StoreRepo>,
    /// `None` when no API key is configured.
    pub recipes: Option<Arc<dyn RecipeSource>>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await?;

        let recipes = match &config.recipe_api {
            Some(api) => Some(Arc::new(SpoonacularClient::new(
                api.clone(),
                config.recipe_timeout_secs,
            )?) as Arc<dyn RecipeSource>),
            None => {
                info!("SPOONACULAR_API_KEY not set; meal plans use the local catalog only");
                None
            }
        };

        Ok(Self {
            catalog: Arc::new(PgCatalogRepo::new(db.clone())),
            users: Arc::new(PgUserRepo::new(db.clone())),
            plans: Arc::new(PgPlanRepo::new(db.clone())),
            grocery: Arc::new(PgGroceryRepo::new(db.clone())),
            stores: Arc::new(PgStoreRepo::new(db.clone())),
            recipes,
            db,
            config,
        })
    }

    /// Composer over this state's catalog and recipe service.
    pub fn composer(&self) -> MealComposer {
        let local = LocalCatalogSource::new(self.catalog.clone());
        let remote = self
            .recipes
            .clone()
            .map(|recipes| RemoteRecipeSource::new(recipes, self.catalog.clone()));
        MealComposer::new(
            local,
            remote,
            Duration::from_secs(self.config.recipe_timeout_secs),
            self.config.meal_slots,
        )
    }
}
