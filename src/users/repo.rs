use async_trait::async_trait;
use sqlx::PgPool;

use super::model::{User, UserDb};
use crate::{db::unique_violation, error::ModelError};

const USER_COLUMNS: &str = "id, name, username, email, password_hash, remember_hash, \
                            follower_count, following_count, created_at, updated_at";

fn taken(constraint: Option<&str>) -> ModelError {
    match constraint {
        Some("users_email_key") => ModelError::EmailTaken,
        Some("users_username_key") => ModelError::UsernameTaken,
        _ => ModelError::Internal(anyhow::anyhow!(
            "unique violation on users ({})",
            constraint.unwrap_or("unknown constraint")
        )),
    }
}

#[derive(Clone)]
pub struct PgUserDb {
    db: PgPool,
}

impl PgUserDb {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn first_where(&self, column: &str, value: &str) -> Result<User, ModelError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(value)
            .fetch_optional(&self.db)
            .await?
            .ok_or(ModelError::NotFound)
    }
}

#[async_trait]
impl UserDb for PgUserDb {
    async fn by_id(&self, id: i64) -> Result<User, ModelError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(ModelError::NotFound)
    }

    async fn by_email(&self, email: &str) -> Result<User, ModelError> {
        self.first_where("email", email).await
    }

    async fn by_username(&self, username: &str) -> Result<User, ModelError> {
        self.first_where("username", username).await
    }

    async fn by_remember(&self, remember_hash: &str) -> Result<User, ModelError> {
        self.first_where("remember_hash", remember_hash).await
    }

    async fn create(&self, user: &mut User) -> Result<(), ModelError> {
        let (id, created_at, updated_at) = sqlx::query_as::<_, (i64, time::OffsetDateTime, time::OffsetDateTime)>(
            r#"
            INSERT INTO users (name, username, email, password_hash, remember_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, created_at, updated_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.remember_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| unique_violation(e, taken))?;

        user.id = id;
        user.created_at = created_at;
        user.updated_at = updated_at;
        Ok(())
    }

    async fn update(&self, user: &mut User) -> Result<(), ModelError> {
        let updated_at = sqlx::query_scalar::<_, time::OffsetDateTime>(
            r#"
            UPDATE users
               SET name = $2, username = $3, email = $4, password_hash = $5,
                   remember_hash = $6, follower_count = $7, following_count = $8,
                   updated_at = now()
             WHERE id = $1
            RETURNING updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.remember_hash)
        .bind(user.follower_count)
        .bind(user.following_count)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| unique_violation(e, taken))?
        .ok_or(ModelError::NotFound)?;

        user.updated_at = updated_at;
        Ok(())
    }

    async fn recount_follows(&self, id: i64) -> Result<(i64, i64), ModelError> {
        sqlx::query_as::<_, (i64, i64)>(
            r#"
            UPDATE users
               SET follower_count = (SELECT COUNT(*) FROM follows WHERE followee_id = $1),
                   following_count = (SELECT COUNT(*) FROM follows WHERE follower_id = $1)
             WHERE id = $1
            RETURNING follower_count, following_count
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ModelError::NotFound)
    }
}
