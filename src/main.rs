mod app;
mod auth;
mod config;
mod db;
mod error;
mod follows;
mod likes;
#[cfg(test)]
mod memory;
mod state;
mod tags;
mod text;
mod tweets;
mod users;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "chirp=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let pool = db::connect(&config).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!(env = ?config.env, "migrations applied");

    let state = AppState::new(pool, config.clone());
    app::serve(app::build_app(state), &config).await
}
