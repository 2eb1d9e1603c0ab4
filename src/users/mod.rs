pub mod dto;
pub mod error;
pub mod gateway;
mod handlers;
pub mod mapper;
pub mod memory;
pub mod pg;
pub mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::user_routes())
        .merge(handlers::legacy_routes())
}
