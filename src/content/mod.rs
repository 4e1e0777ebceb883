pub(crate) mod dto;
pub mod handlers;
mod repo;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::read_routes()
}
