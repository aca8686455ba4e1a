use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;

use super::model::{Tweet, TweetDb};
use crate::{db::unique_violation, error::ModelError};

pub(crate) const TWEET_COLUMNS: &str =
    "t.id, t.post, t.username, t.likes_count, t.retweets_count, t.retweet_id, t.created_at, t.updated_at";

#[derive(Clone)]
pub struct PgTweetDb {
    db: PgPool,
}

impl PgTweetDb {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TweetDb for PgTweetDb {
    async fn by_id(&self, id: i64) -> Result<Tweet, ModelError> {
        let sql = format!("SELECT {TWEET_COLUMNS} FROM tweets t WHERE t.id = $1");
        sqlx::query_as::<_, Tweet>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(ModelError::NotFound)
    }

    async fn by_username(&self, username: &str) -> Result<Vec<Tweet>, ModelError> {
        let sql = format!(
            "SELECT {TWEET_COLUMNS} FROM tweets t WHERE t.username = $1 ORDER BY t.created_at DESC, t.id DESC"
        );
        let rows = sqlx::query_as::<_, Tweet>(&sql)
            .bind(username)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn by_username_and_retweet_id(
        &self,
        username: &str,
        retweet_id: i64,
    ) -> Result<Tweet, ModelError> {
        let sql = format!(
            "SELECT {TWEET_COLUMNS} FROM tweets t WHERE t.username = $1 AND t.retweet_id = $2"
        );
        sqlx::query_as::<_, Tweet>(&sql)
            .bind(username)
            .bind(retweet_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(ModelError::NotFound)
    }

    async fn create(&self, tweet: &mut Tweet) -> Result<(), ModelError> {
        let (id, created_at, updated_at) =
            sqlx::query_as::<_, (i64, OffsetDateTime, OffsetDateTime)>(
                r#"
                INSERT INTO tweets (post, username, retweet_id)
                VALUES ($1, $2, $3)
                RETURNING id, created_at, updated_at
                "#,
            )
            .bind(&tweet.post)
            .bind(&tweet.username)
            .bind(tweet.retweet_id)
            .fetch_one(&self.db)
            .await
            .map_err(|e| unique_violation(e, |_| ModelError::RetweetExists))?;

        tweet.id = id;
        tweet.created_at = created_at;
        tweet.updated_at = updated_at;
        Ok(())
    }

    async fn update(&self, tweet: &mut Tweet) -> Result<(), ModelError> {
        let updated_at = sqlx::query_scalar::<_, OffsetDateTime>(
            "UPDATE tweets SET post = $2, updated_at = now() WHERE id = $1 RETURNING updated_at",
        )
        .bind(tweet.id)
        .bind(&tweet.post)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ModelError::NotFound)?;

        tweet.updated_at = updated_at;
        Ok(())
    }

    async fn recount_likes(&self, id: i64) -> Result<i64, ModelError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE tweets
               SET likes_count = (SELECT COUNT(*) FROM likes WHERE tweet_id = $1)
             WHERE id = $1
            RETURNING likes_count
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ModelError::NotFound)
    }

    async fn recount_retweets(&self, id: i64) -> Result<i64, ModelError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE tweets
               SET retweets_count = (SELECT COUNT(*) FROM tweets r WHERE r.retweet_id = $1)
             WHERE id = $1
            RETURNING retweets_count
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ModelError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<Tweet, ModelError> {
        let sql = format!("DELETE FROM tweets t WHERE t.id = $1 RETURNING {TWEET_COLUMNS}");
        sqlx::query_as::<_, Tweet>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(ModelError::NotFound)
    }
}
