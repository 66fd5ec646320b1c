use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use heatmap_server::config::AppConfig;
use heatmap_server::geocode::NominatimClient;
use heatmap_server::store::StoreRegistry;
use heatmap_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    info!(
        data_dir = %config.store.data_dir.display(),
        nominatim = %config.nominatim.base_url,
        selection = ?config.selection,
        "starting heatmap server"
    );

    // Stores load lazily per country on first request
    let stores = StoreRegistry::new(config.store.clone());
    let geocoder =
        NominatimClient::new(config.nominatim.clone()).context("failed to create geocoder")?;

    let state = AppState::new(stores, geocoder, config.selection);
    let app = create_router(state);

    let addr = config.bind_addr;
    println!("Postcode Heatmap listening on http://{addr}");
    println!();
    println!("API Endpoints:");
    println!("  GET  /health         - Health check");
    println!("  GET  /api/countries  - Supported countries");
    println!("  POST /api/heatmap    - Build heatmap data from a CSV or xlsx body");
    println!("                         (?country=AU&column=postcode&intensity=5)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
