use async_trait::async_trait;
use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::error::ModelError;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    pub id: i64,
    pub post: String,
    pub username: String,
    /// Derived from the tweet's taggings, never stored on the row.
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub likes_count: i64,
    pub retweets_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retweet_id: Option<i64>,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retweet: Option<Box<Tweet>>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Tweet {
    pub fn new(username: &str, post: &str) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: 0,
            post: post.to_string(),
            username: username.to_string(),
            tags: Vec::new(),
            likes_count: 0,
            retweets_count: 0,
            retweet_id: None,
            retweet: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// A retweet of `original` by `username`, with an empty post.
    pub fn retweet_of(username: &str, original: &Tweet) -> Self {
        Self {
            retweet_id: Some(original.id),
            retweet: Some(Box::new(original.clone())),
            ..Self::new(username, "")
        }
    }

    pub fn is_retweet(&self) -> bool {
        self.retweet_id.is_some()
    }
}

#[async_trait]
pub trait TweetDb: Send + Sync {
    async fn by_id(&self, id: i64) -> Result<Tweet, ModelError>;
    /// Newest first.
    async fn by_username(&self, username: &str) -> Result<Vec<Tweet>, ModelError>;
    async fn by_username_and_retweet_id(
        &self,
        username: &str,
        retweet_id: i64,
    ) -> Result<Tweet, ModelError>;

    async fn create(&self, tweet: &mut Tweet) -> Result<(), ModelError>;
    /// Stores the post. Counters are left to the recount operations.
    async fn update(&self, tweet: &mut Tweet) -> Result<(), ModelError>;
    /// Stores the number of Like rows as the tweet's like count and returns it.
    async fn recount_likes(&self, id: i64) -> Result<i64, ModelError>;
    /// Stores the number of retweets as the tweet's retweet count and returns it.
    async fn recount_retweets(&self, id: i64) -> Result<i64, ModelError>;
    /// Removes the tweet together with its taggings, likes and retweets.
    async fn delete(&self, id: i64) -> Result<Tweet, ModelError>;
}
