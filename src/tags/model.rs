use async_trait::async_trait;
use serde::Serialize;
use sqlx::FromRow;

use crate::{error::ModelError, tweets::model::Tweet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Tag {
    #[serde(skip)]
    pub id: i64,
    #[serde(rename = "tagName")]
    pub name: String,
}

impl Tag {
    pub fn named(name: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
        }
    }
}

/// Link between a tag and a tweet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct Tagging {
    pub tag_id: i64,
    pub tweet_id: i64,
}

#[async_trait]
pub trait TagDb: Send + Sync {
    async fn by_id(&self, id: i64) -> Result<Tag, ModelError>;
    async fn by_name(&self, name: &str) -> Result<Tag, ModelError>;
    /// Tags of a tweet, ordered by name.
    async fn by_tweet(&self, tweet_id: i64) -> Result<Vec<Tag>, ModelError>;

    /// Assigns `tag.id` on success. The validating implementation also
    /// fills `tag` with the stored row when it answers `TagExists`.
    async fn create(&self, tag: &mut Tag) -> Result<(), ModelError>;
}

#[async_trait]
pub trait TaggingDb: Send + Sync {
    async fn get(&self, tag_id: i64, tweet_id: i64) -> Result<Tagging, ModelError>;
    async fn by_tweet(&self, tweet_id: i64) -> Result<Vec<Tagging>, ModelError>;
    /// Tweets carrying the tag, newest first.
    async fn tweets(&self, tag_id: i64) -> Result<Vec<Tweet>, ModelError>;

    async fn create(&self, tagging: &Tagging) -> Result<(), ModelError>;
    async fn delete(&self, tag_id: i64, tweet_id: i64) -> Result<(), ModelError>;
}
