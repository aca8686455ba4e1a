use async_trait::async_trait;
use serde::Serialize;
use sqlx::FromRow;

use crate::{error::ModelError, tweets::model::Tweet, users::model::User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub user_id: i64,
    pub tweet_id: i64,
}

#[async_trait]
pub trait LikeDb: Send + Sync {
    async fn get(&self, tweet_id: i64, user_id: i64) -> Result<Like, ModelError>;
    /// Users who liked the tweet.
    async fn users(&self, tweet_id: i64) -> Result<Vec<User>, ModelError>;
    /// Tweets liked by the user, most recent like first.
    async fn liked_tweets(&self, user_id: i64) -> Result<Vec<Tweet>, ModelError>;

    async fn create(&self, like: &Like) -> Result<(), ModelError>;
    async fn delete(&self, tweet_id: i64, user_id: i64) -> Result<(), ModelError>;
}
