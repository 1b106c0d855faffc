use crate::state::AppState;
use axum::Router;

pub mod handlers;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod query;
pub mod store;

pub fn router() -> Router<AppState> {
    handlers::craft_routes()
}
