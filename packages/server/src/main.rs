use std::net::SocketAddr;

use anyhow::Context;
use tracing::{error, info};

use course_server::config::AppConfig;
use course_server::database::init_db;
use course_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        error!("{:#}", err);
        std::process::exit(1);
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}

async fn run() -> anyhow::Result<()> {
    init_tracing()?;

    let config = AppConfig::load().context("failed to load configuration")?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server.host / server.port")?;

    let db = init_db(&config.database)
        .await
        .context("failed to initialize database")?;
    info!("Database ready");

    let app = course_server::build_router(AppState { db, config });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
