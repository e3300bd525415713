use std::sync::Arc;

use anyhow::Context;
use tracing::info;

mod app;
mod config;
mod db;
mod error;
mod response;
mod routes;
mod state;
mod users;

use crate::config::{AppConfig, AppInfo, LogFormat};
use crate::state::AppState;
use crate::users::repo::PgUserRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("load configuration")?;
    init_tracing(&config.app);

    info!(
        app = %config.app.name,
        version = %config.app.version,
        environment = %config.app.environment,
        "starting"
    );

    let db = db::connect(&config.database).await?;
    db::migrate(&db).await?;

    let addr = config.server_address();
    let state = AppState::new(Arc::new(config), Arc::new(PgUserRepository::new(db.clone())));
    app::serve(app::build_app(state), &addr).await?;

    info!("closing database pool");
    db.close().await;
    info!("server stopped");
    Ok(())
}

fn init_tracing(app: &AppInfo) {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        format!(
            "users_api={lvl},axum=info,tower_http={lvl},sqlx=warn",
            lvl = app.log_level
        )
    });

    match app.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(env_filter).init(),
    }
}
