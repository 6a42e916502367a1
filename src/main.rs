mod app;
mod auth;
mod blog;
mod config;
mod contact;
mod db;
mod error;
mod events;
mod labels;
mod pagination;
mod registrations;
mod response;
mod reviews;
mod settings;
mod state;
mod team;
#[cfg(test)]
mod testing;
mod validation;

use crate::{auth::services::seed_admin, config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "codingcouncil=debug,axum=info,tower_http=info".to_string());
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
    let app_state = AppState::init(config).await?;

    sqlx::migrate!("./migrations").run(&app_state.db).await?;

    seed_admin(app_state.users.as_ref(), &app_state.config.admin).await?;

    let config = app_state.config.clone();
    let app = app::build_app(app_state)?;
    app::serve(app, &config).await
}
