mod handlers;
pub mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub use handlers::nearby;
pub use repo::{PgStoreRepo, StoreRepo};
pub use repo_types::{NewStore, Store};

pub fn router() -> Router<AppState> {
    handlers::store_routes()
}
