use async_trait::async_trait;

use super::model::{Tweet, TweetDb};
use crate::{error::ModelError, text::normalize};

pub struct TweetValidator<D> {
    db: D,
}

impl<D: TweetDb> TweetValidator<D> {
    pub fn new(db: D) -> Self {
        Self { db }
    }

    async fn retweet_only_once(&self, tweet: &Tweet) -> Result<(), ModelError> {
        let Some(retweet_id) = tweet.retweet_id else {
            return Ok(());
        };
        match self
            .db
            .by_username_and_retweet_id(&tweet.username, retweet_id)
            .await
        {
            Ok(_) => Err(ModelError::RetweetExists),
            Err(ModelError::NotFound) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

fn username_required(tweet: &mut Tweet) -> Result<(), ModelError> {
    tweet.username = normalize(&tweet.username);
    if tweet.username.is_empty() {
        return Err(ModelError::UsernameRequired);
    }
    Ok(())
}

/// Retweets may carry an empty post.
fn post_required(tweet: &Tweet) -> Result<(), ModelError> {
    if tweet.is_retweet() {
        return Ok(());
    }
    if tweet.post.trim().is_empty() {
        return Err(ModelError::PostRequired);
    }
    Ok(())
}

#[async_trait]
impl<D: TweetDb> TweetDb for TweetValidator<D> {
    async fn by_id(&self, id: i64) -> Result<Tweet, ModelError> {
        if id <= 0 {
            return Err(ModelError::NotFound);
        }
        self.db.by_id(id).await
    }

    async fn by_username(&self, username: &str) -> Result<Vec<Tweet>, ModelError> {
        self.db.by_username(&normalize(username)).await
    }

    async fn by_username_and_retweet_id(
        &self,
        username: &str,
        retweet_id: i64,
    ) -> Result<Tweet, ModelError> {
        self.db
            .by_username_and_retweet_id(&normalize(username), retweet_id)
            .await
    }

    async fn create(&self, tweet: &mut Tweet) -> Result<(), ModelError> {
        username_required(tweet)?;
        post_required(tweet)?;
        self.retweet_only_once(tweet).await?;
        self.db.create(tweet).await
    }

    async fn update(&self, tweet: &mut Tweet) -> Result<(), ModelError> {
        username_required(tweet)?;
        post_required(tweet)?;
        self.db.update(tweet).await
    }

    async fn recount_likes(&self, id: i64) -> Result<i64, ModelError> {
        if id <= 0 {
            return Err(ModelError::IdInvalid);
        }
        self.db.recount_likes(id).await
    }

    async fn recount_retweets(&self, id: i64) -> Result<i64, ModelError> {
        if id <= 0 {
            return Err(ModelError::IdInvalid);
        }
        self.db.recount_retweets(id).await
    }

    async fn delete(&self, id: i64) -> Result<Tweet, ModelError> {
        if id <= 0 {
            return Err(ModelError::IdInvalid);
        }
        self.db.delete(id).await
    }
}
