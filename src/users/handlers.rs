use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{FollowResponse, UserProfile},
    model::User,
    services::refresh_follow_counts,
};
use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, ModelError},
    follows::model::Follow,
    state::{AppState, Services},
    tweets::{model::Tweet, services::hydrate_all},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/:username", get(show))
        .route("/:username/tweets", get(tweets))
        .route("/:username/likes", get(likes))
        .route("/:username/followers", get(followers))
        .route("/:username/following", get(following))
        .route("/:username/follow", post(follow))
        .route("/:username/follow/delete", post(unfollow))
}

async fn user_by_name(
    services: &Services,
    path: Result<Path<String>, PathRejection>,
) -> Result<User, ApiError> {
    let Path(username) = path?;
    services
        .users
        .by_username(&username)
        .await
        .map_err(|e| ApiError::from_model(e, "User"))
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(user_by_name(&state.services, path).await?))
}

#[instrument(skip(state))]
pub async fn tweets(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<Tweet>>, ApiError> {
    let user = user_by_name(&state.services, path).await?;
    let mut tweets = state.services.tweets.by_username(&user.username).await?;
    hydrate_all(&state.services, &mut tweets).await?;
    Ok(Json(tweets))
}

#[instrument(skip(state))]
pub async fn likes(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let user = user_by_name(&state.services, path).await?;
    let mut liked = state.services.likes.liked_tweets(user.id).await?;
    hydrate_all(&state.services, &mut liked).await?;
    Ok(Json(UserProfile {
        liked_tweets: Some(liked),
        ..UserProfile::new(user)
    }))
}

#[instrument(skip(state))]
pub async fn followers(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let user = user_by_name(&state.services, path).await?;
    let followers = state.services.follows.followers(user.id).await?;
    Ok(Json(UserProfile {
        followers: Some(followers),
        ..UserProfile::new(user)
    }))
}

#[instrument(skip(state))]
pub async fn following(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let user = user_by_name(&state.services, path).await?;
    let following = state.services.follows.following(user.id).await?;
    Ok(Json(UserProfile {
        following: Some(following),
        ..UserProfile::new(user)
    }))
}

#[instrument(skip(state, follower))]
pub async fn follow(
    State(state): State<AppState>,
    AuthUser(mut follower): AuthUser,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<FollowResponse>, ApiError> {
    let mut followee = user_by_name(&state.services, path).await?;
    if followee.id == follower.id {
        return Err(ModelError::FollowSelf.into());
    }

    let follow = Follow {
        followee_id: followee.id,
        follower_id: follower.id,
    };
    state.services.follows.create(&follow).await?;
    refresh_follow_counts(&state.services, &mut followee, &mut follower).await?;

    info!(followee_id = %followee.id, follower_id = %follower.id, "user followed");
    Ok(Json(FollowResponse {
        follow,
        user: followee,
    }))
}

#[instrument(skip(state, follower))]
pub async fn unfollow(
    State(state): State<AppState>,
    AuthUser(mut follower): AuthUser,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<User>, ApiError> {
    let mut followee = user_by_name(&state.services, path).await?;
    let follow = state
        .services
        .follows
        .get(followee.id, follower.id)
        .await
        .map_err(|e| ApiError::from_model(e, "Follow on this user"))?;

    state
        .services
        .follows
        .delete(follow.followee_id, follow.follower_id)
        .await?;
    refresh_follow_counts(&state.services, &mut followee, &mut follower).await?;

    info!(followee_id = %followee.id, follower_id = %follower.id, "user unfollowed");
    Ok(Json(followee))
}
