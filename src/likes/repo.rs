use async_trait::async_trait;
use sqlx::PgPool;

use super::model::{Like, LikeDb};
use crate::{
    db::unique_violation,
    error::ModelError,
    tweets::{model::Tweet, repo::TWEET_COLUMNS},
    users::model::User,
};

#[derive(Clone)]
pub struct PgLikeDb {
    db: PgPool,
}

impl PgLikeDb {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LikeDb for PgLikeDb {
    async fn get(&self, tweet_id: i64, user_id: i64) -> Result<Like, ModelError> {
        sqlx::query_as::<_, Like>(
            "SELECT user_id, tweet_id FROM likes WHERE tweet_id = $1 AND user_id = $2",
        )
        .bind(tweet_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ModelError::NotFound)
    }

    async fn users(&self, tweet_id: i64) -> Result<Vec<User>, ModelError> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, u.username, u.email, u.password_hash, u.remember_hash,
                   u.follower_count, u.following_count, u.created_at, u.updated_at
              FROM users u
              JOIN likes l ON l.user_id = u.id
             WHERE l.tweet_id = $1
             ORDER BY l.created_at
            "#,
        )
        .bind(tweet_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn liked_tweets(&self, user_id: i64) -> Result<Vec<Tweet>, ModelError> {
        let sql = format!(
            "SELECT {TWEET_COLUMNS} FROM tweets t \
             JOIN likes l ON l.tweet_id = t.id AND l.user_id = $1 \
             ORDER BY l.created_at DESC"
        );
        let rows = sqlx::query_as::<_, Tweet>(&sql)
            .bind(user_id)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn create(&self, like: &Like) -> Result<(), ModelError> {
        sqlx::query("INSERT INTO likes (user_id, tweet_id) VALUES ($1, $2)")
            .bind(like.user_id)
            .bind(like.tweet_id)
            .execute(&self.db)
            .await
            .map_err(|e| unique_violation(e, |_| ModelError::LikeExists))?;
        Ok(())
    }

    async fn delete(&self, tweet_id: i64, user_id: i64) -> Result<(), ModelError> {
        let result = sqlx::query("DELETE FROM likes WHERE tweet_id = $1 AND user_id = $2")
            .bind(tweet_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ModelError::NotFound);
        }
        Ok(())
    }
}
