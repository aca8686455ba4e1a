use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::ApiError,
    state::AppState,
    tweets::{model::Tweet, services::hydrate_all},
};

pub fn tag_routes() -> Router<AppState> {
    Router::new().route("/tags/:name", get(show))
}

/// Tweets carrying the tag, newest first.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<Tweet>>, ApiError> {
    let Path(name) = path?;
    let tag = state
        .services
        .tags
        .by_name(&name)
        .await
        .map_err(|e| ApiError::from_model(e, "Tag"))?;

    let mut tweets = state.services.taggings.tweets(tag.id).await?;
    hydrate_all(&state.services, &mut tweets).await?;
    Ok(Json(tweets))
}
