mod dto;
mod handlers;
pub mod imports;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod views;

use crate::state::AppState;
use axum::Router;

pub use repo::{GroceryRepo, PgGroceryRepo};
pub use repo_types::{GroceryChange, GroceryItem, GroceryItemDetails};
pub use services::{add_ingredients, BatchOutcome, IngredientInput};

pub fn router() -> Router<AppState> {
    handlers::grocery_routes()
}
