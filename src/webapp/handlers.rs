use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument};

use super::dto::{PlanSummary, ProfileSummary, WebAppMessage, WebAppReply};
use crate::{
    errors::{AppError, AppResult},
    extract::AppJson,
    grocery::views,
    nutrition::evaluate,
    state::AppState,
    users::repo_types::ProfileFields,
};

pub fn webapp_routes() -> Router<AppState> {
    Router::new().route("/webapp/data", post(receive))
}

#[instrument(skip(state, payload))]
pub async fn receive(
    State(state): State<AppState>,
    AppJson(payload): AppJson<WebAppMessage>,
) -> AppResult<Json<WebAppReply>> {
    respond(&state, payload).await.map(Json)
}

/// Computes the reply for one mini app message.
pub async fn respond(state: &AppState, message: WebAppMessage) -> AppResult<WebAppReply> {
    match message {
        WebAppMessage::Profile(data) => {
            data.profile.validate()?;
            let target = evaluate(&data.profile);
            let saved = match data.user_id {
                Some(user_id) => {
                    state
                        .users
                        .update_profile(user_id, &ProfileFields::from(&data.profile))
                        .await?
                        .ok_or(AppError::NotFound("User"))?;
                    info!(%user_id, "profile received from mini app");
                    true
                }
                None => false,
            };
            Ok(WebAppReply::Profile(ProfileSummary {
                daily_nutrition: target.rounded(),
                saved,
            }))
        }
        WebAppMessage::MealPlan(r) => {
            let plan = state
                .plans
                .latest_for_user(r.user_id)
                .await?
                .ok_or(AppError::NotFound("Meal plan"))?;
            let meals = state.plans.meals_for_plan(plan.id).await?;
            Ok(WebAppReply::MealPlan(PlanSummary {
                plan_id: plan.id,
                days: plan.days,
                source: plan.source,
                meals: meals.len(),
                daily_nutrition: plan.target().rounded(),
                total_cost: (plan.total_cost * 100.0).round() / 100.0,
            }))
        }
        WebAppMessage::Groceries(r) => {
            let items = state.grocery.list_with_details(r.user_id).await?;
            Ok(WebAppReply::Groceries(views::totals(&items)))
        }
    }
}
