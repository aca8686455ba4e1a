use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{config::AppConfig, error::ModelError};

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")
}

/// Translates a unique-constraint violation into the domain error picked by
/// `on_unique` from the violated constraint's name. Other errors pass
/// through as [`ModelError::Database`].
pub fn unique_violation(
    err: sqlx::Error,
    on_unique: impl FnOnce(Option<&str>) -> ModelError,
) -> ModelError {
    let mapped = err
        .as_database_error()
        .filter(|db_err| db_err.is_unique_violation())
        .map(|db_err| on_unique(db_err.constraint()));
    match mapped {
        Some(domain) => domain,
        None => ModelError::Database(err),
    }
}
