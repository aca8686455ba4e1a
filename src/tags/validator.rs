use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

use super::model::{Tag, TagDb, Tagging, TaggingDb};
use crate::{error::ModelError, text::normalize, tweets::model::Tweet};

lazy_static! {
    static ref SPECIAL_CHARS_RE: Regex = Regex::new(r"[^a-zA-Z0-9]").unwrap();
}

/// Runs the pure part of tag validation (normalize, require, reject special
/// characters) and returns the normalized name.
pub fn validate_tag_name(name: &str) -> Result<String, ModelError> {
    let name = normalize(name);
    if name.is_empty() {
        return Err(ModelError::NameRequired);
    }
    if SPECIAL_CHARS_RE.is_match(&name) {
        return Err(ModelError::TagNoSpecialChar);
    }
    Ok(name)
}

pub struct TagValidator<D> {
    db: D,
}

impl<D: TagDb> TagValidator<D> {
    pub fn new(db: D) -> Self {
        Self { db }
    }

    /// On a duplicate, overwrites `tag` with the stored row and answers
    /// `TagExists`.
    async fn no_duplicates(&self, tag: &mut Tag) -> Result<(), ModelError> {
        match self.db.by_name(&tag.name).await {
            Ok(existing) => {
                *tag = existing;
                Err(ModelError::TagExists)
            }
            Err(ModelError::NotFound) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl<D: TagDb> TagDb for TagValidator<D> {
    async fn by_id(&self, id: i64) -> Result<Tag, ModelError> {
        self.db.by_id(id).await
    }

    async fn by_name(&self, name: &str) -> Result<Tag, ModelError> {
        self.db.by_name(&normalize(name)).await
    }

    async fn by_tweet(&self, tweet_id: i64) -> Result<Vec<Tag>, ModelError> {
        self.db.by_tweet(tweet_id).await
    }

    async fn create(&self, tag: &mut Tag) -> Result<(), ModelError> {
        tag.name = validate_tag_name(&tag.name)?;
        self.no_duplicates(tag).await?;
        match self.db.create(tag).await {
            // Lost a race with a concurrent create: resolve to the winner.
            Err(ModelError::TagExists) => {
                *tag = self.db.by_name(&tag.name).await?;
                Err(ModelError::TagExists)
            }
            other => other,
        }
    }
}

pub struct TaggingValidator<D> {
    db: D,
}

impl<D: TaggingDb> TaggingValidator<D> {
    pub fn new(db: D) -> Self {
        Self { db }
    }

    async fn no_duplicates(&self, tagging: &Tagging) -> Result<(), ModelError> {
        match self.db.get(tagging.tag_id, tagging.tweet_id).await {
            Ok(_) => Err(ModelError::TaggingExists),
            Err(ModelError::NotFound) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl<D: TaggingDb> TaggingDb for TaggingValidator<D> {
    async fn get(&self, tag_id: i64, tweet_id: i64) -> Result<Tagging, ModelError> {
        self.db.get(tag_id, tweet_id).await
    }

    async fn by_tweet(&self, tweet_id: i64) -> Result<Vec<Tagging>, ModelError> {
        self.db.by_tweet(tweet_id).await
    }

    async fn tweets(&self, tag_id: i64) -> Result<Vec<Tweet>, ModelError> {
        self.db.tweets(tag_id).await
    }

    async fn create(&self, tagging: &Tagging) -> Result<(), ModelError> {
        self.no_duplicates(tagging).await?;
        self.db.create(tagging).await
    }

    async fn delete(&self, tag_id: i64, tweet_id: i64) -> Result<(), ModelError> {
        self.db.delete(tag_id, tweet_id).await
    }
}
