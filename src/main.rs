mod app;
mod config;
mod content;
mod error;
mod schema;
mod seed;
mod state;
mod store;
mod submissions;

#[cfg(test)]
mod testing;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "ronys_kitchen=debug,axum=info,tower_http=info".to_string());
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
    let addr = config.listen_addr();
    let app_state = AppState::init(config).await?;

    // Seed before binding so no request ever sees a half-seeded store.
    if app_state.config.seed_on_startup {
        let report = seed::seed_if_empty(app_state.store.as_ref()).await?;
        tracing::info!(seeded = report.seeded.len(), "seed check complete");
    } else {
        tracing::info!("seeding disabled");
    }

    let app = app::build_app(app_state);
    app::serve(app, &addr).await
}
