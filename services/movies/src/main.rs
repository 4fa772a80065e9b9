use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use cinema_core::config::Config;
use cinema_core::tracing::init_tracing;
use cinema_movies::config::MoviesConfig;
use cinema_movies::router::build_router;
use cinema_movies::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = MoviesConfig::from_env().context("load movies config")?;

    let db = Database::connect(&config.database_url)
        .await
        .context("connect to database")?;

    let state = AppState { db };

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.movies_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("bind {http_addr}"))?;

    info!("movies service listening on {http_addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
