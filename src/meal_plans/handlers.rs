use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{GeneratePlanRequest, MealView, PlanResponse},
    services::{generate_plan, GenerateInput},
};
use crate::{
    errors::{AppError, AppResult},
    extract::AppJson,
    state::AppState,
};

pub fn meal_plan_routes() -> Router<AppState> {
    Router::new()
        .route("/meal-plans/generate", post(generate))
        .route("/meal-plans/:id", get(get_plan))
        .route("/meal-plans/user/:user_id", get(latest_plan))
        .route("/meals/user/:user_id/day/:day", get(meals_for_day))
}

#[instrument(skip(state, payload), fields(user_id = %payload.user_id))]
pub async fn generate(
    State(state): State<AppState>,
    AppJson(payload): AppJson<GeneratePlanRequest>,
) -> AppResult<(StatusCode, Json<PlanResponse>)> {
    let generated = generate_plan(
        &state,
        GenerateInput {
            user_id: payload.user_id,
            profile: payload.profile,
            days: payload.days.unwrap_or(1),
            diet: payload.diet.filter(|d| !d.trim().is_empty()),
        },
    )
    .await?;
    let mut body = PlanResponse::new(&generated.plan, &generated.meals);
    body.grocery_items = Some(generated.grocery_items);
    Ok((StatusCode::CREATED, Json(body)))
}

#[instrument(skip(state))]
pub async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PlanResponse>> {
    let plan = state
        .plans
        .get_plan(id)
        .await?
        .ok_or(AppError::NotFound("Meal plan"))?;
    let meals = state.plans.meals_for_plan(plan.id).await?;
    Ok(Json(PlanResponse::new(&plan, &meals)))
}

#[instrument(skip(state))]
pub async fn latest_plan(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<PlanResponse>> {
    let plan = state
        .plans
        .latest_for_user(user_id)
        .await?
        .ok_or(AppError::NotFound("Meal plan"))?;
    let meals = state.plans.meals_for_plan(plan.id).await?;
    Ok(Json(PlanResponse::new(&plan, &meals)))
}

#[instrument(skip(state))]
pub async fn meals_for_day(
    State(state): State<AppState>,
    Path((user_id, day)): Path<(Uuid, i32)>,
) -> AppResult<Json<Vec<MealView>>> {
    let meals = state.plans.meals_for_user_day(user_id, day).await?;
    Ok(Json(meals.iter().map(MealView::from).collect()))
}
