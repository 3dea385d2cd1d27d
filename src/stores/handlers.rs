use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, instrument};

use super::repo_types::{NewStore, Store};
use crate::{
    errors::{AppError, AppResult},
    extract::AppJson,
    state::AppState,
};

pub const DEFAULT_RADIUS_KM: f64 = 5.0;

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
}

pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/stores", get(list_stores).post(create_store))
        .route("/stores/nearby", get(nearby_stores))
}

/// Stores within `radius_km` of the point, nearest first.
pub fn nearby(stores: Vec<Store>, lat: f64, lng: f64, radius_km: f64) -> Vec<Store> {
    let mut hits: Vec<(f64, Store)> = stores
        .into_iter()
        .map(|s| (s.distance_km(lat, lng), s))
        .filter(|(d, _)| *d <= radius_km)
        .collect();
    hits.sort_by(|a, b| a.0.total_cmp(&b.0));
    hits.into_iter().map(|(_, s)| s).collect()
}

#[instrument(skip(state))]
pub async fn list_stores(State(state): State<AppState>) -> AppResult<Json<Vec<Store>>> {
    Ok(Json(state.stores.all().await?))
}

#[instrument(skip(state))]
pub async fn nearby_stores(
    State(state): State<AppState>,
    Query(q): Query<NearbyQuery>,
) -> AppResult<Json<Vec<Store>>> {
    let (lat, lng) = match (q.lat, q.lng) {
        (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => (lat, lng),
        _ => return Err(AppError::validation("Invalid coordinates")),
    };
    let radius = q.radius.unwrap_or(DEFAULT_RADIUS_KM);
    if !(radius.is_finite() && radius >= 0.0) {
        return Err(AppError::validation("radius must be a non-negative number"));
    }
    let stores = state.stores.all().await?;
    Ok(Json(nearby(stores, lat, lng, radius)))
}

#[instrument(skip(state, payload))]
pub async fn create_store(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewStore>,
) -> AppResult<(StatusCode, Json<Store>)> {
    payload.validate()?;
    let store = state.stores.create(&payload).await?;
    info!(store_id = %store.id, name = %store.name, "store created");
    Ok((StatusCode::CREATED, Json(store)))
}
