use axum::Router;

use crate::state::AppState;

mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod password;
pub mod services;
pub mod token;

/// Session cookie holding the raw remember token.
pub const REMEMBER_COOKIE: &str = "remember_token";

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
