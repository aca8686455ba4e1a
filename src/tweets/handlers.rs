use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::TweetForm,
    model::Tweet,
    services::{
        create_tags, hydrate, hydrate_all, refresh_likes, refresh_retweets, sync_tags, tag_names,
    },
};
use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    likes::model::Like,
    state::{AppState, Services},
    users::model::User,
};

type TweetPath = Result<Path<(String, i64)>, PathRejection>;

pub fn tweet_routes() -> Router<AppState> {
    Router::new()
        .route("/i/tweets", get(index))
        .route("/tweets", post(create))
        .route("/:username/:id", get(show))
        .route("/:username/:id/update", post(update))
        .route("/:username/:id/delete", post(delete))
        .route("/:username/:id/like", post(like))
        .route("/:username/:id/like/delete", post(unlike))
        .route("/:username/:id/liked", get(liked_by))
        .route("/:username/:id/retweet", post(retweet))
}

/// Loads the tweet named by the path. The username segment is cosmetic:
/// lookup goes by id alone.
async fn tweet_by_path(services: &Services, path: TweetPath) -> Result<Tweet, ApiError> {
    let Path((_username, id)) = path?;
    tweet_by_id(services, id).await
}

async fn tweet_by_id(services: &Services, id: i64) -> Result<Tweet, ApiError> {
    services
        .tweets
        .by_id(id)
        .await
        .map_err(|e| ApiError::from_model(e, "Tweet"))
}

fn ensure_author(tweet: &Tweet, user: &User) -> Result<(), ApiError> {
    if tweet.username != user.username {
        return Err(ApiError::not_author());
    }
    Ok(())
}

#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Tweet>>, ApiError> {
    let mut tweets = state.services.tweets.by_username(&user.username).await?;
    hydrate_all(&state.services, &mut tweets).await?;
    Ok(Json(tweets))
}

#[instrument(skip(state, user, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<TweetForm>, JsonRejection>,
) -> Result<Json<Tweet>, ApiError> {
    let Json(form) = payload?;
    let tags = tag_names(&form.tags)?;

    let mut tweet = Tweet::new(&user.username, &form.post);
    state.services.tweets.create(&mut tweet).await?;
    tweet.tags = tags;
    if let Err(e) = create_tags(&state.services, &tweet).await {
        // No half-tagged tweet is left behind.
        if let Err(cleanup) = state.services.tweets.delete(tweet.id).await {
            warn!(error = %cleanup, tweet_id = %tweet.id, "drop partially tagged tweet");
        }
        return Err(e.into());
    }

    info!(tweet_id = %tweet.id, user_id = %user.id, "tweet created");
    Ok(Json(tweet))
}

#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, path: TweetPath) -> Result<Json<Tweet>, ApiError> {
    let mut tweet = tweet_by_path(&state.services, path).await?;
    hydrate(&state.services, &mut tweet).await?;
    Ok(Json(tweet))
}

#[instrument(skip(state, user, payload))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: TweetPath,
    payload: Result<Json<TweetForm>, JsonRejection>,
) -> Result<Json<Tweet>, ApiError> {
    let mut tweet = tweet_by_path(&state.services, path).await?;
    ensure_author(&tweet, &user)?;
    let Json(form) = payload?;
    let tags = tag_names(&form.tags)?;

    tweet.post = form.post;
    state.services.tweets.update(&mut tweet).await?;
    sync_tags(&state.services, &mut tweet, tags).await?;

    // Counters may have moved since the tweet was loaded.
    let mut tweet = tweet_by_id(&state.services, tweet.id).await?;
    hydrate(&state.services, &mut tweet).await?;

    info!(tweet_id = %tweet.id, "tweet updated");
    Ok(Json(tweet))
}

#[instrument(skip(state, user))]
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: TweetPath,
) -> Result<Json<Tweet>, ApiError> {
    let tweet = tweet_by_path(&state.services, path).await?;
    ensure_author(&tweet, &user)?;

    let deleted = state.services.tweets.delete(tweet.id).await?;
    if let Some(original_id) = deleted.retweet_id {
        if let Ok(mut original) = state.services.tweets.by_id(original_id).await {
            refresh_retweets(&state.services, &mut original).await?;
        }
    }

    info!(tweet_id = %deleted.id, "tweet deleted");
    Ok(Json(deleted))
}

#[instrument(skip(state, user))]
pub async fn like(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: TweetPath,
) -> Result<Json<Tweet>, ApiError> {
    let mut tweet = tweet_by_path(&state.services, path).await?;
    let like = Like {
        user_id: user.id,
        tweet_id: tweet.id,
    };
    state.services.likes.create(&like).await?;
    refresh_likes(&state.services, &mut tweet).await?;
    hydrate(&state.services, &mut tweet).await?;
    Ok(Json(tweet))
}

#[instrument(skip(state, user))]
pub async fn unlike(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: TweetPath,
) -> Result<Json<Tweet>, ApiError> {
    let mut tweet = tweet_by_path(&state.services, path).await?;
    let like = state
        .services
        .likes
        .get(tweet.id, user.id)
        .await
        .map_err(|e| ApiError::from_model(e, "Like on this tweet"))?;

    state.services.likes.delete(like.tweet_id, like.user_id).await?;
    refresh_likes(&state.services, &mut tweet).await?;
    hydrate(&state.services, &mut tweet).await?;
    Ok(Json(tweet))
}

#[instrument(skip(state))]
pub async fn liked_by(
    State(state): State<AppState>,
    path: TweetPath,
) -> Result<Json<Vec<User>>, ApiError> {
    let tweet = tweet_by_path(&state.services, path).await?;
    let users = state.services.likes.users(tweet.id).await?;
    Ok(Json(users))
}

/// Retweeting a retweet targets the tweet it embeds.
#[instrument(skip(state, user))]
pub async fn retweet(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: TweetPath,
) -> Result<Json<Tweet>, ApiError> {
    let mut original = tweet_by_path(&state.services, path).await?;
    if let Some(original_id) = original.retweet_id {
        original = tweet_by_id(&state.services, original_id).await?;
    }

    let mut retweet = Tweet::retweet_of(&user.username, &original);
    state.services.tweets.create(&mut retweet).await?;
    refresh_retweets(&state.services, &mut original).await?;
    hydrate(&state.services, &mut retweet).await?;

    info!(tweet_id = %retweet.id, original_id = %original.id, "tweet retweeted");
    Ok(Json(retweet))
}
