use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::repo_types::{FoodItem, NewFoodItem};
use crate::{
    errors::{AppError, AppResult},
    extract::AppJson,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CategoryFilter {
    pub category: Option<String>,
}

pub fn food_item_routes() -> Router<AppState> {
    Router::new()
        .route("/food-items", get(list_food_items).post(create_food_item))
        .route("/food-items/:id", get(get_food_item))
}

#[instrument(skip(state))]
pub async fn list_food_items(
    State(state): State<AppState>,
    Query(filter): Query<CategoryFilter>,
) -> AppResult<Json<Vec<FoodItem>>> {
    let items = match filter.category.as_deref() {
        Some(category) => state.catalog.by_category(category).await?,
        None => state.catalog.all().await?,
    };
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_food_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<FoodItem>> {
    state
        .catalog
        .get(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Food item"))
}

#[instrument(skip(state, payload))]
pub async fn create_food_item(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewFoodItem>,
) -> AppResult<(StatusCode, Json<FoodItem>)> {
    payload.validate()?;
    let item = state.catalog.create(&payload).await?;
    info!(food_item_id = %item.id, name = %item.name, "food item created");
    Ok((StatusCode::CREATED, Json(item)))
}
