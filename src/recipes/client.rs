use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::types::{RecipeDetails, RemoteMealPlan};
use crate::{config::RecipeApiConfig, errors::AppError};

#[derive(Debug, Error)]
pub enum RecipeApiError {
    #[error("request timed out")]
    Timeout,
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("{0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for RecipeApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RecipeApiError::Timeout
        } else if e.is_decode() {
            RecipeApiError::Decode(e.to_string())
        } else {
            RecipeApiError::Transport(e.to_string())
        }
    }
}

impl RecipeApiError {
    pub fn into_app_error(self, timeout_secs: u64) -> AppError {
        match self {
            RecipeApiError::Timeout => AppError::UpstreamTimeout(timeout_secs),
            RecipeApiError::InvalidInput(msg) => AppError::Validation(msg),
            other => AppError::UpstreamFailure(other.to_string()),
        }
    }
}

/// Third-party recipe service.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn generate_meal_plan(
        &self,
        target_calories: u32,
        diet: Option<&str>,
    ) -> Result<RemoteMealPlan, RecipeApiError>;

    async fn recipe_information(&self, id: i64) -> Result<RecipeDetails, RecipeApiError>;

    async fn search_recipes(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Value, RecipeApiError>;

    async fn search_by_ingredients(
        &self,
        ingredients: &[String],
        number: u32,
    ) -> Result<Value, RecipeApiError>;

    async fn search_products(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Value, RecipeApiError>;

    async fn product_information(&self, id: i64) -> Result<Value, RecipeApiError>;

    /// Seconds after which a single call is abandoned.
    fn timeout_secs(&self) -> u64;
}

/// Spoonacular REST client.
pub struct SpoonacularClient {
    config: RecipeApiConfig,
    http_client: reqwest::Client,
    timeout_secs: u64,
}

impl SpoonacularClient {
    pub fn new(config: RecipeApiConfig, timeout_secs: u64) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            config,
            http_client,
            timeout_secs,
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, RecipeApiError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        debug!(%endpoint, "spoonacular request");
        let response = self
            .http_client
            .get(&url)
            .query(&[("apiKey", self.config.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%endpoint, status = status.as_u16(), "spoonacular error response");
            return Err(RecipeApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

fn offset(page: u32, page_size: u32) -> u32 {
    page.max(1).saturating_sub(1).saturating_mul(page_size)
}

#[async_trait]
impl RecipeSource for SpoonacularClient {
    async fn generate_meal_plan(
        &self,
        target_calories: u32,
        diet: Option<&str>,
    ) -> Result<RemoteMealPlan, RecipeApiError> {
        if target_calories == 0 {
            return Err(RecipeApiError::InvalidInput(
                "target calories must be positive".into(),
            ));
        }
        let mut params = vec![
            ("targetCalories", target_calories.to_string()),
            ("timeFrame", "day".to_string()),
        ];
        if let Some(diet) = diet {
            params.push(("diet", diet.to_string()));
        }
        self.fetch("/mealplanner/generate", &params).await
    }

    async fn recipe_information(&self, id: i64) -> Result<RecipeDetails, RecipeApiError> {
        self.fetch(
            &format!("/recipes/{id}/information"),
            &[("includeNutrition", "true".to_string())],
        )
        .await
    }

    async fn search_recipes(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Value, RecipeApiError> {
        self.fetch(
            "/recipes/complexSearch",
            &[
                ("query", query.to_string()),
                ("offset", offset(page, page_size).to_string()),
                ("number", page_size.to_string()),
                ("addRecipeInformation", "true".to_string()),
                ("fillIngredients", "true".to_string()),
                ("instructionsRequired", "true".to_string()),
            ],
        )
        .await
    }

    async fn search_by_ingredients(
        &self,
        ingredients: &[String],
        number: u32,
    ) -> Result<Value, RecipeApiError> {
        self.fetch(
            "/recipes/findByIngredients",
            &[
                ("ingredients", ingredients.join(",")),
                ("number", number.to_string()),
                ("ranking", "1".to_string()),
                ("ignorePantry", "true".to_string()),
            ],
        )
        .await
    }

    async fn search_products(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Value, RecipeApiError> {
        let mut response: Value = self
            .fetch(
                "/food/products/search",
                &[
                    ("query", query.to_string()),
                    ("offset", offset(page, page_size).to_string()),
                    ("number", page_size.to_string()),
                ],
            )
            .await?;
        Ok(response
            .get_mut("products")
            .map(Value::take)
            .unwrap_or(Value::Array(Vec::new())))
    }

    async fn product_information(&self, id: i64) -> Result<Value, RecipeApiError> {
        self.fetch(&format!("/food/products/{id}"), &[]).await
    }

    fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}
