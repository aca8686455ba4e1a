use axum::Router;

use crate::state::AppState;

pub mod handlers;
pub mod model;
pub mod repo;
pub mod validator;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::tag_routes())
}
