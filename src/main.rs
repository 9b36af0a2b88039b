// src/main.rs

use std::sync::Arc;

use commission_dashboard::{app, config::Settings, db::SqlServerSource, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("commission_dashboard=info,tower_http=info")),
        )
        .init();

    let settings = Arc::new(Settings::from_env()?);
    tracing::info!(
        connection = %settings.redacted_connection_string(),
        auth = settings.describe_auth(),
        "using SQL Server"
    );

    let source = SqlServerSource::new(Arc::clone(&settings));
    let router = app(AppState::new(source, Arc::clone(&settings)));

    let addr = settings.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "commission dashboard listening");

    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}
