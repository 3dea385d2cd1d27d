mod dto;
mod handlers;
pub mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub use repo::{PgUserRepo, UserRepo};
pub use repo_types::User;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
