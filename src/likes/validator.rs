use async_trait::async_trait;

use super::model::{Like, LikeDb};
use crate::{error::ModelError, tweets::model::Tweet, users::model::User};

pub struct LikeValidator<D> {
    db: D,
}

impl<D: LikeDb> LikeValidator<D> {
    pub fn new(db: D) -> Self {
        Self { db }
    }

    async fn no_duplicates(&self, like: &Like) -> Result<(), ModelError> {
        match self.db.get(like.tweet_id, like.user_id).await {
            Ok(_) => Err(ModelError::LikeExists),
            Err(ModelError::NotFound) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl<D: LikeDb> LikeDb for LikeValidator<D> {
    async fn get(&self, tweet_id: i64, user_id: i64) -> Result<Like, ModelError> {
        self.db.get(tweet_id, user_id).await
    }

    async fn users(&self, tweet_id: i64) -> Result<Vec<User>, ModelError> {
        self.db.users(tweet_id).await
    }

    async fn liked_tweets(&self, user_id: i64) -> Result<Vec<Tweet>, ModelError> {
        self.db.liked_tweets(user_id).await
    }

    async fn create(&self, like: &Like) -> Result<(), ModelError> {
        if like.user_id <= 0 {
            return Err(ModelError::UserIdRequired);
        }
        self.no_duplicates(like).await?;
        self.db.create(like).await
    }

    async fn delete(&self, tweet_id: i64, user_id: i64) -> Result<(), ModelError> {
        self.db.delete(tweet_id, user_id).await
    }
}
