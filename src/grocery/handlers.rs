use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{
        AddGroceryItemRequest, BatchAddRequest, BatchUpdateRequest, FromMealRequest,
        FromRecipeRequest,
    },
    imports,
    repo_types::{GroceryChange, GroceryItem},
    services::{self, BatchOutcome, IngredientInput},
    views::{GroceryList, ListFilter},
};
use crate::{
    errors::{AppError, AppResult},
    extract::AppJson,
    state::AppState,
};

pub fn grocery_routes() -> Router<AppState> {
    Router::new()
        .route("/grocery-items", post(add_item))
        .route("/grocery-items/user/:user_id", get(list_items))
        .route("/grocery-items/batch", post(batch_add).patch(batch_update))
        .route("/grocery-items/from-meal", post(add_from_meal))
        .route("/grocery-items/from-recipe", post(add_from_recipe))
        .route("/grocery-items/:id", patch(update_item))
}

#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(filter): Query<ListFilter>,
) -> AppResult<Json<GroceryList>> {
    let all = state.grocery.list_with_details(user_id).await?;
    Ok(Json(GroceryList::build(all, &filter)))
}

#[instrument(skip(state, payload))]
pub async fn add_item(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AddGroceryItemRequest>,
) -> AppResult<(StatusCode, Json<GroceryItem>)> {
    let input = IngredientInput {
        food_item_id: payload.food_item_id,
        quantity: payload.quantity,
    };
    let item = services::add_one(
        state.grocery.as_ref(),
        payload.user_id,
        input,
        payload.meal_plan_id,
    )
    .await?;
    info!(grocery_item_id = %item.id, user_id = %item.user_id, "grocery item added");
    Ok((StatusCode::CREATED, Json(item)))
}

#[instrument(skip(state, payload))]
pub async fn batch_add(
    State(state): State<AppState>,
    AppJson(payload): AppJson<BatchAddRequest>,
) -> AppResult<(StatusCode, Json<BatchOutcome>)> {
    let outcome = services::add_ingredients(
        state.grocery.as_ref(),
        payload.user_id,
        payload.meal_plan_id,
        &payload.items,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

#[instrument(skip(state, payload))]
pub async fn batch_update(
    State(state): State<AppState>,
    AppJson(payload): AppJson<BatchUpdateRequest>,
) -> AppResult<Json<BatchOutcome>> {
    let outcome = services::batch_update(state.grocery.as_ref(), &payload.items).await?;
    Ok(Json(outcome))
}

#[instrument(skip(state, payload))]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<GroceryChange>,
) -> AppResult<Json<GroceryItem>> {
    let item = services::update_one(state.grocery.as_ref(), id, &payload).await?;
    Ok(Json(item))
}

#[instrument(skip(state))]
pub async fn add_from_meal(
    State(state): State<AppState>,
    AppJson(payload): AppJson<FromMealRequest>,
) -> AppResult<(StatusCode, Json<BatchOutcome>)> {
    let outcome = imports::add_meal(
        state.plans.as_ref(),
        state.grocery.as_ref(),
        payload.meal_id,
        payload.user_id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

#[instrument(skip(state))]
pub async fn add_from_recipe(
    State(state): State<AppState>,
    AppJson(payload): AppJson<FromRecipeRequest>,
) -> AppResult<(StatusCode, Json<BatchOutcome>)> {
    let recipes = state
        .recipes
        .as_ref()
        .ok_or_else(|| AppError::UpstreamFailure("recipe service is not configured".into()))?;
    let outcome = imports::import_recipe(
        recipes.as_ref(),
        state.catalog.as_ref(),
        state.grocery.as_ref(),
        payload.user_id,
        payload.recipe_id,
        payload.meal_plan_id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}
