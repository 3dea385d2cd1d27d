//! Spoonacular recipe service: client, response types and pass-through routes.

pub mod client;
mod handlers;
pub mod types;

use crate::state::AppState;
use axum::Router;

pub use client::{RecipeApiError, RecipeSource, SpoonacularClient};
pub use types::{RecipeDetails, RecipeIngredient, RemoteMealPlan};

pub fn router() -> Router<AppState> {
    handlers::recipe_routes()
}
