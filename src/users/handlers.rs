use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::CreateUserRequest,
    repo_types::{ProfileFields, User},
};
use crate::{
    errors::{AppError, AppResult},
    extract::AppJson,
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/:id", get(get_user).patch(update_user))
        .route("/users/telegram/:telegram_id", get(get_user_by_telegram_id))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let username = payload.username.trim();
    if username.is_empty() {
        return Err(AppError::validation("username is required"));
    }
    payload.profile.validate()?;

    if let Some(telegram_id) = payload.telegram_id.as_deref() {
        if state.users.get_by_telegram_id(telegram_id).await?.is_some() {
            warn!(%telegram_id, "telegram id already registered");
            return Err(AppError::validation("Telegram account already registered"));
        }
    }

    let user = state
        .users
        .create(username, payload.telegram_id.as_deref(), &payload.profile)
        .await?;
    info!(user_id = %user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<User>> {
    state.users.get(id).await?.map(Json).ok_or(AppError::NotFound("User"))
}

#[instrument(skip(state))]
pub async fn get_user_by_telegram_id(
    State(state): State<AppState>,
    Path(telegram_id): Path<String>,
) -> AppResult<Json<User>> {
    state
        .users
        .get_by_telegram_id(&telegram_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("User"))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<ProfileFields>,
) -> AppResult<Json<User>> {
    payload.validate()?;
    let user = state
        .users
        .update_profile(id, &payload)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    info!(user_id = %user.id, "profile updated");
    Ok(Json(user))
}
