//! Plan generation: profile evaluation, meal composition and persistence.

pub mod composer;
mod dto;
mod handlers;
pub mod local;
pub mod remote;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use composer::{MealComposer, MealSource};
pub use local::LocalCatalogSource;
pub use remote::{recipe_portions, RemoteRecipeSource};
pub use repo::{PgPlanRepo, PlanRepo};
pub use repo_types::{Meal, MealPlan, PlanSource};

pub fn router() -> Router<AppState> {
    handlers::meal_plan_routes()
}
