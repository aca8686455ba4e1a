use axum::Router;

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod model;
pub mod repo;
pub mod services;
pub mod validator;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::tweet_routes())
}
