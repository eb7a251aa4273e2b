//! BambuGoods Storefront - server-rendered affiliate catalog and blog

use anyhow::Result;
use bambu_storefront::{
    api::{ApiClient, CatalogApi},
    config::Config,
    identity::{load_or_create, FileStore},
    server::{router, AppState},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = Config::from_env()?;
    let api: Arc<dyn CatalogApi> = Arc::new(ApiClient::new(&config)?);

    // Per-install id for log correlation; visitors carry their own in a cookie.
    let instance_id = load_or_create(&FileStore::new(&config.state_dir))?;

    match api.health_check().await {
        Ok(h) => tracing::info!("backend at {} is up: {} ({})", config.api_base(), h.message, h.version),
        Err(e) => tracing::warn!("backend at {} not reachable yet: {}", config.api_base(), e),
    }

    let app = router(AppState::new(api));
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("🚀 BambuGoods storefront {} listening on {}", instance_id, addr);
    axum::serve(tokio::net::TcpListener::bind(&addr).await?, app).await?;
    Ok(())
}
