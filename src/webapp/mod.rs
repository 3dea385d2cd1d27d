//! Intake for `{type, data}` messages sent by the Telegram mini app.

pub mod dto;
mod handlers;

use crate::state::AppState;
use axum::Router;

pub use dto::{WebAppMessage, WebAppReply};
pub use handlers::respond;

pub fn router() -> Router<AppState> {
    handlers::webapp_routes()
}
