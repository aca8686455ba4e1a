use async_trait::async_trait;

use super::model::{Follow, FollowDb};
use crate::{error::ModelError, users::model::User};

pub struct FollowValidator<D> {
    db: D,
}

impl<D: FollowDb> FollowValidator<D> {
    pub fn new(db: D) -> Self {
        Self { db }
    }

    async fn no_duplicates(&self, follow: &Follow) -> Result<(), ModelError> {
        match self.db.get(follow.followee_id, follow.follower_id).await {
            Ok(_) => Err(ModelError::FollowExists),
            Err(ModelError::NotFound) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl<D: FollowDb> FollowDb for FollowValidator<D> {
    async fn get(&self, followee_id: i64, follower_id: i64) -> Result<Follow, ModelError> {
        self.db.get(followee_id, follower_id).await
    }

    async fn followers(&self, user_id: i64) -> Result<Vec<User>, ModelError> {
        self.db.followers(user_id).await
    }

    async fn following(&self, user_id: i64) -> Result<Vec<User>, ModelError> {
        self.db.following(user_id).await
    }

    async fn create(&self, follow: &Follow) -> Result<(), ModelError> {
        if follow.follower_id <= 0 {
            return Err(ModelError::UserIdRequired);
        }
        if follow.followee_id == follow.follower_id {
            return Err(ModelError::FollowSelf);
        }
        self.no_duplicates(follow).await?;
        self.db.create(follow).await
    }

    async fn delete(&self, followee_id: i64, follower_id: i64) -> Result<(), ModelError> {
        self.db.delete(followee_id, follower_id).await
    }
}
