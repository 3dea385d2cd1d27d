use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, instrument};

use super::{client::RecipeSource, types::RecipeDetails};
use crate::{
    errors::{AppError, AppResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct IngredientsQuery {
    pub ingredients: Option<String>,
    pub number: Option<u32>,
}

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes/search", get(search_recipes))
        .route("/recipes/by-ingredients", get(search_by_ingredients))
        .route("/recipes/:id", get(get_recipe))
        .route("/products/search", get(search_products))
        .route("/products/:id", get(get_product))
}

fn source(state: &AppState) -> AppResult<&Arc<dyn RecipeSource>> {
    state
        .recipes
        .as_ref()
        .ok_or_else(|| AppError::UpstreamFailure("recipe service is not configured".into()))
}

fn required_query(q: &SearchQuery) -> AppResult<&str> {
    q.query
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::validation("Query parameter is required"))
}

#[instrument(skip(state))]
pub async fn search_recipes(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> AppResult<Json<Value>> {
    let query = required_query(&q)?;
    let src = source(&state)?;
    let page_size = q.page_size.unwrap_or(24).clamp(1, 100);
    src.search_recipes(query, q.page.unwrap_or(1), page_size)
        .await
        .map(Json)
        .map_err(|e| {
            error!(error = %e, "recipe search failed");
            e.into_app_error(src.timeout_secs())
        })
}

#[instrument(skip(state))]
pub async fn search_by_ingredients(
    State(state): State<AppState>,
    Query(q): Query<IngredientsQuery>,
) -> AppResult<Json<Value>> {
    let ingredients: Vec<String> = q
        .ingredients
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if ingredients.is_empty() {
        return Err(AppError::validation("Ingredients parameter is required"));
    }
    let src = source(&state)?;
    src.search_by_ingredients(&ingredients, q.number.unwrap_or(5).clamp(1, 100))
        .await
        .map(Json)
        .map_err(|e| {
            error!(error = %e, "search by ingredients failed");
            e.into_app_error(src.timeout_secs())
        })
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RecipeDetails>> {
    let src = source(&state)?;
    src.recipe_information(id)
        .await
        .map(Json)
        .map_err(|e| {
            error!(error = %e, recipe_id = id, "recipe lookup failed");
            e.into_app_error(src.timeout_secs())
        })
}

#[instrument(skip(state))]
pub async fn search_products(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> AppResult<Json<Value>> {
    let query = required_query(&q)?;
    let src = source(&state)?;
    let page_size = q.page_size.unwrap_or(10).clamp(1, 100);
    src.search_products(query, q.page.unwrap_or(1), page_size)
        .await
        .map(Json)
        .map_err(|e| {
            error!(error = %e, "product search failed");
            e.into_app_error(src.timeout_secs())
        })
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let src = source(&state)?;
    src.product_information(id)
        .await
        .map(Json)
        .map_err(|e| {
            error!(error = %e, product_id = id, "product lookup failed");
            e.into_app_error(src.timeout_secs())
        })
}
