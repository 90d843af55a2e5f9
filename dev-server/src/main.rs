//! Development server for dashboard work
//!
//! Starts the fake incubator backend on a fixed port and fills it with a
//! realistic dataset, so a dashboard can be pointed at it with
//! `API_BASE_URL=http://127.0.0.1:5000/apiic_api`.
//!
//! Usage: cargo run -p dev-server

use anyhow::Result;
use test_helpers::{
    backend::{ADMIN_EMAIL, ADMIN_PASSWORD, API_PREFIX},
    mock::DevDataset,
    telemetry,
};
use tracing::info;

const DEFAULT_PORT: u16 = 5000;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let subscriber = telemetry::get_subscriber("info".into());
    telemetry::init_subscriber(subscriber);

    let port = match std::env::var("DEV_SERVER_PORT") {
        Ok(port) => port.parse()?,
        Err(_) => DEFAULT_PORT,
    };

    info!("🚀 Starting incubator development backend");
    let app = test_helpers::spawn_app_on_port(port).await;
    info!("✅ API server running on {}", app.address);

    info!("📊 Setting up development data...");
    let dataset = DevDataset::create(&app).await?;

    info!("🎯 Development server ready!");
    info!("   API:   http://127.0.0.1:{}{API_PREFIX}", app.port);
    info!("   Login: {ADMIN_EMAIL} / {ADMIN_PASSWORD}");
    info!("");
    dataset.print_summary();
    info!("");
    info!("👋 Press Ctrl+C to shutdown");

    tokio::signal::ctrl_c().await?;
    info!("🛑 Shutting down development server");
    Ok(())
}
