mod handlers;
pub mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub use repo::{CatalogRepo, PgCatalogRepo};
pub use repo_types::{FoodItem, NewFoodItem};

pub fn router() -> Router<AppState> {
    handlers::food_item_routes()
}
